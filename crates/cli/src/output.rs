use engine_config::report::summary::RunSummary;
use std::path::Path;

const RULE_WIDTH: usize = 60;

/// Human-readable block mirroring the figures of the JSON summary.
pub fn render_summary(summary: &RunSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!(
        "\n{rule}\n\
         BATCH PROCESSING SUMMARY\n\
         {rule}\n\
         Run ID: {}\n\
         Input file: {}\n\
         Output file: {}\n\
         Total customers: {}\n\
         Successful predictions: {}\n\
         Failed predictions: {}\n\
         Success rate: {:.2}%\n",
        summary.run_id,
        summary.input_file,
        summary.output_file,
        summary.total_customers,
        summary.successful_predictions,
        summary.failed_predictions,
        summary.success_rate,
    );

    if summary.successful_predictions > 0 {
        let stats = &summary.statistics;
        out.push_str(&format!(
            "\nPREDICTION STATISTICS:\n\
             Average churn probability: {:.4}\n\
             High risk customers (>=70%): {}\n\
             Medium risk customers (30-70%): {}\n\
             Low risk customers (<30%): {}\n",
            stats.average_probability,
            stats.high_risk_count,
            stats.medium_risk_count,
            stats.low_risk_count,
        ));
    }

    let failures = &summary.failures;
    if failures.total() > 0 {
        out.push_str(&format!(
            "\nFailures: {} HTTP, {} network, {} other\n",
            failures.http_error, failures.network_error, failures.unknown
        ));
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

pub fn print_summary(summary: &RunSummary, summary_path: &Path) {
    println!("{}", render_summary(summary));
    println!("Processing summary saved to: {}", summary_path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_config::report::summary::RunCounts;
    use engine_core::context::run::RunContext;

    fn summary(total: u64, probabilities: &[f64]) -> RunSummary {
        RunSummary::new(
            Path::new("customers.csv"),
            Path::new("scored.csv"),
            RunCounts {
                total,
                succeeded: probabilities.len() as u64,
                probabilities,
            },
            &RunContext::new("customers.csv").finish(),
        )
    }

    #[test]
    fn figures_use_fixed_precision() {
        let text = render_summary(&summary(3, &[0.82, 0.1]));

        assert!(text.contains("BATCH PROCESSING SUMMARY"));
        assert!(text.contains(&"=".repeat(60)));
        assert!(text.contains("Success rate: 66.67%"));
        assert!(text.contains("Average churn probability: 0.4600"));
        assert!(text.contains("High risk customers (>=70%): 1"));
        assert!(text.contains("Low risk customers (<30%): 1"));
    }

    #[test]
    fn statistics_are_omitted_without_successes() {
        let text = render_summary(&summary(2, &[]));
        assert!(text.contains("Success rate: 0.00%"));
        assert!(!text.contains("PREDICTION STATISTICS"));
    }

    #[test]
    fn block_lines_come_in_order() {
        let text = render_summary(&summary(4, &[0.5, 0.5]));
        let lines: Vec<&str> = text.lines().collect();
        let rule = "=".repeat(60);

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], rule);
        assert_eq!(lines[2], "BATCH PROCESSING SUMMARY");
        assert_eq!(lines[3], rule);
        assert!(lines[4].starts_with("Run ID: "));
        assert_eq!(lines[5], "Input file: customers.csv");
        assert_eq!(lines[6], "Output file: scored.csv");
        assert_eq!(lines[7], "Total customers: 4");
        assert_eq!(lines[8], "Successful predictions: 2");
        assert_eq!(lines[9], "Failed predictions: 2");
        assert_eq!(lines[10], "Success rate: 50.00%");
        assert_eq!(lines[11], "");
        assert_eq!(lines[12], "PREDICTION STATISTICS:");
        assert_eq!(lines[14], "High risk customers (>=70%): 0");
        assert_eq!(lines[15], "Medium risk customers (30-70%): 2");
        assert_eq!(lines.last(), Some(&rule.as_str()));
    }
}
