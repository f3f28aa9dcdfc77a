//! Apparent temperature, using the NWS heat index and wind chill regressions.

/// Apparent temperature in °F for air temperature `temp_f` (°F), relative
/// humidity `humidity` (%) and wind speed `wind_mph`.
///
/// Heat index applies from 68°F upwards, wind chill at or below 50°F with
/// wind above 3 mph. Anything else is returned unchanged.
pub fn feels_like(temp_f: f64, humidity: f64, wind_mph: f64) -> f64 {
    if temp_f >= 68.0 {
        heat_index(temp_f, humidity)
    } else if temp_f <= 50.0 && wind_mph > 3.0 {
        wind_chill(temp_f, wind_mph)
    } else {
        temp_f
    }
}

fn heat_index(t: f64, h: f64) -> f64 {
    -42.379 + 2.04901523 * t + 10.14333127 * h
        - 0.22475541 * t * h
        - 0.00683783 * t.powi(2)
        - 0.05481717 * h.powi(2)
        + 0.00122874 * t.powi(2) * h
        + 0.00085282 * t * h.powi(2)
        - 0.00000199 * t.powi(2) * h.powi(2)
}

fn wind_chill(t: f64, v: f64) -> f64 {
    let v16 = v.powf(0.16);
    35.74 + 0.6215 * t - 35.75 * v16 + 0.4275 * t * v16
}
