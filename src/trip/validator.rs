use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Outcome of validating a decoded trip document. A single pass collects
/// every finding; nothing here ever panics on malformed input.
#[derive(Clone, Debug, Default)]
pub struct TripValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

fn get_string<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(|v| v.as_str())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Validate an arbitrary decoded JSON value against the trip schema.
///
/// Non-object input short-circuits immediately; everything else is checked
/// exhaustively so one pass yields the complete diagnostic report.
pub fn validate(raw: &Value) -> TripValidation {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let Some(map) = raw.as_object() else {
        return TripValidation {
            is_valid: false,
            errors: vec!["Trip data must be a JSON object".to_string()],
            warnings,
        };
    };

    match map.get("trip_name") {
        Some(Value::String(_)) => {}
        Some(_) => errors.push("'trip_name' must be a string".to_string()),
        None => errors.push("Missing required field 'trip_name'".to_string()),
    }

    match map.get("timezone") {
        Some(Value::String(_)) => {}
        Some(_) => errors.push("'timezone' must be a string".to_string()),
        None => errors.push("Missing required field 'timezone'".to_string()),
    }

    if map.get("trip_id").is_none() {
        warnings.push("Missing 'trip_id'; the document cannot be addressed by id".to_string());
    }

    match map.get("stops") {
        Some(Value::Array(stops)) => {
            if stops.is_empty() {
                warnings.push("'stops' is empty; the itinerary has no content".to_string());
            }
            let mut seen_ids: HashSet<&str> = HashSet::new();
            for (index, stop) in stops.iter().enumerate() {
                validate_stop(stop, index, &mut seen_ids, &mut errors, &mut warnings);
            }
        }
        Some(_) => errors.push("'stops' must be an array".to_string()),
        None => errors.push("Missing required field 'stops'".to_string()),
    }

    TripValidation {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn validate_stop<'a>(
    stop: &'a Value,
    index: usize,
    seen_ids: &mut HashSet<&'a str>,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let Some(map) = stop.as_object() else {
        errors.push(format!("stops[{index}] must be an object"));
        return;
    };

    let label = match get_string(map, "stop_id") {
        Some(id) if !id.is_empty() => {
            if !seen_ids.insert(id) {
                errors.push(format!("Duplicate stop_id '{id}' at stops[{index}]"));
            }
            format!("stops[{index}] ('{id}')")
        }
        Some(_) => {
            errors.push(format!("stops[{index}] has an empty 'stop_id'"));
            format!("stops[{index}]")
        }
        None => {
            errors.push(format!(
                "stops[{index}] is missing required field 'stop_id'"
            ));
            format!("stops[{index}]")
        }
    };

    if get_string(map, "name").is_none() {
        errors.push(format!("{label} is missing required string field 'name'"));
    }

    validate_date_range(map.get("date"), &label, errors);
    validate_location(map.get("location"), &label, errors);

    match map.get("duration_days").and_then(|v| v.as_f64()) {
        Some(days) if days >= 0.0 => {}
        Some(_) => errors.push(format!("{label} has a negative 'duration_days'")),
        None => errors.push(format!(
            "{label} is missing required numeric field 'duration_days'"
        )),
    }

    match map.get("activities") {
        Some(Value::Array(activities)) => {
            if activities.is_empty() {
                warnings.push(format!("{label} has no activities"));
            }
            for (i, activity) in activities.iter().enumerate() {
                validate_activity(activity, &format!("{label}.activities[{i}]"), errors);
            }
        }
        Some(_) => errors.push(format!("{label}: 'activities' must be an array")),
        None => errors.push(format!("{label} is missing required field 'activities'")),
    }

    // Scenic waypoints share the activity shape.
    if let Some(waypoints) = map.get("scenic_waypoints") {
        match waypoints {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    validate_activity(item, &format!("{label}.scenic_waypoints[{i}]"), errors);
                }
            }
            _ => errors.push(format!("{label}: 'scenic_waypoints' must be an array")),
        }
    }
}

fn validate_date_range(date: Option<&Value>, label: &str, errors: &mut Vec<String>) {
    let Some(date) = date else {
        errors.push(format!("{label} is missing required field 'date'"));
        return;
    };
    let Some(map) = date.as_object() else {
        errors.push(format!("{label}: 'date' must be an object"));
        return;
    };

    let from = get_string(map, "from").and_then(parse_date);
    let to = get_string(map, "to").and_then(parse_date);

    if from.is_none() {
        errors.push(format!(
            "{label}: 'date.from' must be a YYYY-MM-DD calendar date"
        ));
    }
    if to.is_none() {
        errors.push(format!(
            "{label}: 'date.to' must be a YYYY-MM-DD calendar date"
        ));
    }
    if let (Some(from), Some(to)) = (from, to) {
        if to < from {
            errors.push(format!("{label}: 'date.to' is before 'date.from'"));
        }
    }
}

fn validate_location(location: Option<&Value>, label: &str, errors: &mut Vec<String>) {
    let Some(location) = location else {
        errors.push(format!("{label} is missing required field 'location'"));
        return;
    };
    let Some(map) = location.as_object() else {
        errors.push(format!("{label}: 'location' must be an object"));
        return;
    };

    match map.get("lat").and_then(|v| v.as_f64()) {
        Some(lat) if (-90.0..=90.0).contains(&lat) => {}
        Some(_) => errors.push(format!("{label}: 'location.lat' is outside [-90, 90]")),
        None => errors.push(format!("{label}: 'location.lat' must be a number")),
    }
    match map.get("lng").and_then(|v| v.as_f64()) {
        Some(lng) if (-180.0..=180.0).contains(&lng) => {}
        Some(_) => errors.push(format!("{label}: 'location.lng' is outside [-180, 180]")),
        None => errors.push(format!("{label}: 'location.lng' must be a number")),
    }
}

fn validate_activity(activity: &Value, label: &str, errors: &mut Vec<String>) {
    let Some(map) = activity.as_object() else {
        errors.push(format!("{label} must be an object"));
        return;
    };

    if get_string(map, "activity_id").is_none() {
        errors.push(format!(
            "{label} is missing required string field 'activity_id'"
        ));
    }
    if get_string(map, "activity_name").is_none() {
        errors.push(format!(
            "{label} is missing required string field 'activity_name'"
        ));
    }

    // Each location sub-field is optional but must be well-typed if present.
    if let Some(location) = map.get("location") {
        let Some(loc) = location.as_object() else {
            errors.push(format!("{label}: 'location' must be an object"));
            return;
        };
        if let Some(lat) = loc.get("lat") {
            if !lat.is_number() {
                errors.push(format!("{label}: 'location.lat' must be a number"));
            }
        }
        if let Some(lng) = loc.get("lng") {
            if !lng.is_number() {
                errors.push(format!("{label}: 'location.lng' must be a number"));
            }
        }
        if let Some(address) = loc.get("address") {
            if !address.is_string() {
                errors.push(format!("{label}: 'location.address' must be a string"));
            }
        }
    }
}
