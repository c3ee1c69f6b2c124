use model::{prediction::payload::RequestPayload, records::customer::CustomerRecord};

/// Converts an input record into the request body of the prediction endpoint.
///
/// Every field is carried under `customer` with its name and typed value
/// unchanged, in column order. Values are not validated here; that is the
/// endpoint's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestMapper;

impl RequestMapper {
    pub fn new() -> Self {
        RequestMapper
    }

    pub fn map(&self, record: &CustomerRecord) -> RequestPayload {
        let customer = record
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.value.to_json()))
            .collect();

        RequestPayload { customer }
    }
}
