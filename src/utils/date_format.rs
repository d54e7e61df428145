use time::{Date, macros::format_description};

use crate::error::Result;
use crate::utils::xml::XmlWriter;

/// Write a date in the legacy function shape:
/// `<name><year>2020</year><month>01</month><day>31</day></name>`.
pub(crate) fn write_date_parts(writer: &mut XmlWriter, name: &str, date: Date) -> Result<()> {
    writer.start(name)?;
    writer.text_element("year", &date.year().to_string())?;
    writer.text_element("month", &format!("{:02}", u8::from(date.month())))?;
    writer.text_element("day", &format!("{:02}", date.day()))?;
    writer.end(name)
}

// Intacct renders dates as MM/DD/YYYY in query results.
pub fn parse_intacct_date(date_str: &str) -> std::result::Result<Date, String> {
    let format = format_description!("[month]/[day]/[year]");
    if let Ok(date) = Date::parse(date_str, &format) {
        return Ok(date);
    }

    // Some report functions return ISO dates instead
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(date_str, &format).map_err(|e| format!("Failed to parse date '{date_str}': {e}"))
}
