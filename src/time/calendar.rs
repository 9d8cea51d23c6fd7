//! Proleptic Gregorian calendar and Julian day arithmetic

/// Julian day number of the civil day (year, month, day), i.e. the Julian
/// date of noon on that day.
pub fn julian_day_number(year: i32, month: u32, day: u32) -> i64 {
    let (year, month, day) = (year as i64, month as i64, day as i64);
    let janfeb = if month < 3 { 1 } else { 0 };
    1461 * (year + 4800 - janfeb) / 4 + 367 * (month - 2 + 12 * janfeb) / 12
        - 3 * ((year + 4900 - janfeb) / 100) / 4
        - 32075
        + day
}

/// Julian date of midnight at the start of (year, month, day)
pub fn julian_date_at_midnight(year: i32, month: u32, day: u32) -> f64 {
    julian_day_number(year, month, day) as f64 - 0.5
}

/// Calendar date of a Julian day number.
///
/// See the Explanatory Supplement to the Astronomical Almanac, 15.11.
pub fn calendar_date(jdn: i64) -> (i32, u32, u32) {
    let f = jdn + 1401 + ((4 * jdn + 274277) / 146097 * 3 / 4 - 38);
    let e = 4 * f + 3;
    let g = (e % 1461) / 4;
    let h = 5 * g + 2;
    let day = (h % 153) / 5 + 1;
    let month = (h / 153 + 2) % 12 + 1;
    let year = e / 1461 - 4716 + (12 + 2 - month) / 12;
    (year as i32, month as u32, day as u32)
}

/// Split a Julian date given as `whole + fraction` into the Julian day number
/// of the civil day and the elapsed fraction of that day in `[0, 1)`.
pub fn split_civil_day(whole: f64, fraction: f64) -> (i64, f64) {
    let shifted = whole + 0.5;
    let base = shifted.floor();
    let mut day_fraction = (shifted - base) + fraction;
    let carry = day_fraction.floor();
    day_fraction -= carry;
    ((base + carry) as i64, day_fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_julian_day_number() {
        assert_eq!(julian_day_number(2000, 1, 1), 2451545);
        assert_eq!(julian_day_number(2020, 4, 12), 2458952);
        assert_eq!(julian_day_number(1969, 7, 20), 2440423);
        assert_eq!(julian_day_number(1800, 1, 1), 2378497);
    }

    #[test]
    fn test_calendar_date_inverts_day_number() {
        for jdn in [2378497_i64, 2440423, 2451545, 2458952, 2524594] {
            let (y, m, d) = calendar_date(jdn);
            assert_eq!(julian_day_number(y, m, d), jdn);
        }
        assert_eq!(calendar_date(2451545), (2000, 1, 1));
    }

    #[test]
    fn test_midnight() {
        assert_eq!(julian_date_at_midnight(2000, 1, 1), 2451544.5);
        assert_eq!(julian_date_at_midnight(1970, 1, 1), 2440587.5);
    }

    #[test]
    fn test_split_civil_day_carries_fraction() {
        let (jdn, frac) = split_civil_day(2451544.5, 0.75);
        assert_eq!(jdn, 2451545);
        assert!((frac - 0.75).abs() < 1e-12);

        let (jdn, frac) = split_civil_day(2451544.5, 1.25);
        assert_eq!(jdn, 2451546);
        assert!((frac - 0.25).abs() < 1e-12);

        let (jdn, frac) = split_civil_day(2451545.0, -0.1);
        assert_eq!(jdn, 2451545);
        assert!((frac - 0.4).abs() < 1e-12);
    }
}
