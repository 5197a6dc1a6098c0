use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{anyhow, Context};

/// Read a GeoJSON FeatureCollection from file. A single Feature is wrapped in a collection.
pub fn read_feature_collection_from_file(
    input_filepath: &Path,
) -> anyhow::Result<geojson::FeatureCollection> {
    let contents = fs::read_to_string(input_filepath)
        .with_context(|| format!("Reading GeoJSON file {:?}", input_filepath))?;
    let geojson: geojson::GeoJson = contents
        .parse()
        .with_context(|| format!("Parsing GeoJSON file {:?}", input_filepath))?;
    match geojson {
        geojson::GeoJson::FeatureCollection(collection) => Ok(collection),
        geojson::GeoJson::Feature(feature) => Ok(geojson::FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }),
        geojson::GeoJson::Geometry(_) => Err(anyhow!(
            "{:?} holds a bare geometry, expected a FeatureCollection",
            input_filepath
        )),
    }
}

/// Serialize a FeatureCollection as a single JSON document.
pub fn write_feature_collection<W: Write>(
    collection: &geojson::FeatureCollection,
    writer: W,
) -> anyhow::Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, collection)?;
    writer.flush()?;
    Ok(())
}

/// Serialize the features of a collection as newline-delimited GeoJSON, one Feature per line.
pub fn to_line_delimited(collection: &geojson::FeatureCollection) -> anyhow::Result<String> {
    let mut contents = String::new();
    for feature in &collection.features {
        contents.push_str(&serde_json::to_string(feature)?);
        contents.push('\n');
    }
    Ok(contents)
}
