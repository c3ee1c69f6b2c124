pub mod stub;

#[cfg(test)]
mod scenarios;
