//! Plain-text rendering of the screen state.

use skycast_core::model::{DayForecast, WeatherReport};
use skycast_core::ScreenState;

pub fn print_state(state: &ScreenState) {
    match &state.report {
        Some(report) => print_report(report),
        None => println!("No forecast loaded yet."),
    }
}

pub fn print_report(report: &WeatherReport) {
    println!("{}", report_to_string(report));
}

fn report_to_string(report: &WeatherReport) -> String {
    let mut out = String::new();

    let place = report
        .location
        .as_ref()
        .map(|loc| {
            match (loc.name.as_deref(), loc.country.as_deref()) {
                (Some(name), Some(country)) => format!("{name}, {country}"),
                (Some(name), None) => name.to_string(),
                _ => "Unknown location".to_string(),
            }
        })
        .unwrap_or_else(|| "Unknown location".to_string());
    out.push_str(&format!("== {place} ==\n"));

    if let Some(current) = &report.current {
        let condition = current
            .condition
            .as_ref()
            .and_then(|c| c.text.as_deref())
            .unwrap_or("-");
        out.push_str(&format!(
            "Now: {}  {}\n",
            fmt_temp(current.temp_c),
            condition
        ));
        if let Some(wind) = current.wind_kph {
            out.push_str(&format!("Wind: {wind} km/h\n"));
        }
        if let Some(humidity) = current.humidity {
            out.push_str(&format!("Humidity: {humidity}%\n"));
        }
    }

    if let Some(sunrise) = report
        .days()
        .first()
        .and_then(|d| d.astro.as_ref())
        .and_then(|a| a.sunrise.as_deref())
    {
        out.push_str(&format!("Sunrise: {sunrise}\n"));
    }

    if !report.days().is_empty() {
        out.push_str("\nDaily forecast:\n");
        for day in report.days() {
            out.push_str(&day_line(day));
            out.push('\n');
        }
    }

    out
}

fn day_line(day: &DayForecast) -> String {
    let name = day
        .date
        .map(|d| d.format("%A").to_string())
        .unwrap_or_else(|| "?".to_string());
    let summary = day.day.as_ref();
    let temp = fmt_temp(summary.and_then(|s| s.avgtemp_c));
    let condition = summary
        .and_then(|s| s.condition.as_ref())
        .and_then(|c| c.text.as_deref())
        .unwrap_or("-");
    format!("  {name:<10} {temp:>7}  {condition}")
}

fn fmt_temp(temp: Option<f64>) -> String {
    match temp {
        Some(t) => format!("{t:.0}°C"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use skycast_core::model::{
        Astro, Condition, CurrentConditions, DaySummary, Forecast, LocationInfo,
    };

    fn sample_report() -> WeatherReport {
        WeatherReport {
            location: Some(LocationInfo {
                name: Some("Astana".into()),
                country: Some("Kazakhstan".into()),
            }),
            current: Some(CurrentConditions {
                temp_c: Some(-3.4),
                condition: Some(Condition {
                    text: Some("Light snow".into()),
                }),
                wind_kph: Some(20.2),
                humidity: Some(86),
            }),
            forecast: Some(Forecast {
                forecastday: vec![DayForecast {
                    date: NaiveDate::from_ymd_opt(2026, 8, 23),
                    day: Some(DaySummary {
                        avgtemp_c: Some(-1.5),
                        condition: Some(Condition {
                            text: Some("Overcast".into()),
                        }),
                    }),
                    astro: Some(Astro {
                        sunrise: Some("06:12 AM".into()),
                        sunset: None,
                    }),
                }],
            }),
        }
    }

    #[test]
    fn report_renders_place_current_and_days() {
        let text = report_to_string(&sample_report());
        assert!(text.contains("Astana, Kazakhstan"));
        assert!(text.contains("-3°C"));
        assert!(text.contains("Light snow"));
        assert!(text.contains("Sunrise: 06:12 AM"));
        assert!(text.contains("Sunday"));
        assert!(text.contains("Overcast"));
    }

    #[test]
    fn empty_report_renders_placeholder_place() {
        let text = report_to_string(&WeatherReport::default());
        assert!(text.contains("Unknown location"));
    }
}
