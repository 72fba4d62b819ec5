use anyhow::{Context, Result};
use basemap_layers::OutputFeature;
use geojson::{feature::Id, Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use std::path::Path;

/// Convert an output feature to GeoJSON with the attributes visible at `zoom`.
///
/// Layer and min zoom go into a `tippecanoe` member so the file can be fed
/// straight to a tile builder.
fn feature_to_geojson(feature: &OutputFeature, zoom: u8) -> Result<Feature> {
    let mut properties = JsonObject::new();
    for (key, value) in feature.attributes_at(zoom) {
        properties.insert(
            key.to_string(),
            serde_json::to_value(value).context("Failed to serialize attribute")?,
        );
    }

    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "tippecanoe".to_string(),
        serde_json::json!({
            "layer": feature.layer(),
            "minzoom": feature.min_zoom(),
        }),
    );

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(feature.geometry()))),
        id: feature.id().map(|id| Id::Number(u64::from(id).into())),
        properties: Some(properties),
        foreign_members: Some(foreign_members),
    })
}

/// Write features to a GeoJSON file as a single FeatureCollection
pub fn write_features_geojson(
    features: &[OutputFeature],
    zoom: u8,
    output_path: &Path,
    pretty: bool,
) -> Result<()> {
    log::info!("Writing {} features to {}", features.len(), output_path.display());

    let features = features
        .iter()
        .map(|feature| feature_to_geojson(feature, zoom))
        .collect::<Result<Vec<_>>>()?;

    let feature_collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let geojson = GeoJson::from(feature_collection);
    let json_string = if pretty {
        serde_json::to_string_pretty(&geojson)
    } else {
        serde_json::to_string(&geojson)
    }
    .context("Failed to serialize GeoJSON")?;

    std::fs::write(output_path, json_string)
        .with_context(|| format!("Failed to write GeoJSON to {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use basemap_layers::{FeatureId, OutputFeature};
    use geo::Point;

    fn crossing() -> OutputFeature {
        let mut feature = OutputFeature::new("transit", Point::new(13.4, 52.5).into());
        feature
            .set_id(FeatureId::new(42))
            .set_attr("kind", "crossing")
            .set_attr("min_zoom", 16u8)
            .set_attr_with_min_zoom("name", "Oranienplatz", 17)
            .set_min_zoom(16);
        feature
    }

    #[test]
    fn test_feature_to_geojson() {
        let feature = feature_to_geojson(&crossing(), 16).unwrap();

        let properties = feature.properties.unwrap();
        assert_eq!(properties["kind"], serde_json::json!("crossing"));
        assert_eq!(properties["min_zoom"], serde_json::json!(16));
        assert!(!properties.contains_key("name"));

        assert_eq!(feature.id, Some(Id::Number(42u64.into())));

        let tippecanoe = &feature.foreign_members.unwrap()["tippecanoe"];
        assert_eq!(tippecanoe["layer"], serde_json::json!("transit"));
        assert_eq!(tippecanoe["minzoom"], serde_json::json!(16));

        match feature.geometry.unwrap().value {
            Value::Point(coords) => assert_eq!(coords, vec![13.4, 52.5]),
            _ => panic!("Expected Point value"),
        }
    }

    #[test]
    fn test_zoom_dependent_attributes() {
        let feature = feature_to_geojson(&crossing(), 17).unwrap();
        let properties = feature.properties.unwrap();
        assert_eq!(properties["name"], serde_json::json!("Oranienplatz"));
    }
}
