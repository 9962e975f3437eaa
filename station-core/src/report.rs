use crate::{
    date::{DateError, format_date},
    model::Observation,
    store::RecordStore,
};

pub const REPORT_HEADER: &str = "[Weather Information]";

/// One report row: display date, then each measurement to one decimal place.
pub fn format_line(date: &str, obs: &Observation) -> Result<String, DateError> {
    Ok(format!(
        "{}\t| {:.1}°C\t| {:.1}%| {:.1}%| {:.1}°C| {:.1}km/hr",
        format_date(date)?,
        obs.temperature,
        obs.humidity,
        obs.precipitation,
        obs.heat_index,
        obs.wind_speed,
    ))
}

/// All rows in ascending date order. Fails on the first key that is not a valid date.
pub fn render(store: &RecordStore) -> Result<Vec<String>, DateError> {
    store.iter().map(|(date, obs)| format_line(date, obs)).collect()
}
