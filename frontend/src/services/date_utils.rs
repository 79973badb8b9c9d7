use js_sys::Date;
use milk_ledger_client::calendar::month_of;

/// Today in the browser's local time zone (YYYY-MM-DD)
pub fn local_today() -> String {
    let now = Date::new_0();
    let year = now.get_full_year();
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();

    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Current month in the browser's local time zone (YYYY-MM)
pub fn local_month() -> String {
    month_of(&local_today()).to_string()
}
