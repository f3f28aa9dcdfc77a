use crate::model::Coordinates;

/// Mean of the distinct latitudes and, independently, of the distinct
/// longitudes of a `[longitude, latitude]` ring. `None` for an empty ring.
pub fn centroid(ring: &[[f64; 2]]) -> Option<Coordinates> {
    let latitude = mean_of_distinct(ring.iter().map(|v| v[1]))?;
    let longitude = mean_of_distinct(ring.iter().map(|v| v[0]))?;
    Some(Coordinates::new(latitude, longitude))
}

fn mean_of_distinct(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut seen: Vec<f64> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    if seen.is_empty() {
        return None;
    }
    Some(seen.iter().sum::<f64>() / seen.len() as f64)
}
