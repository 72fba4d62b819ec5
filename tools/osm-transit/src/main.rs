use anyhow::{bail, Context, Result};
use basemap_layers::rules::MAX_ZOOM;
use basemap_layers::{
    NameResolver, NoNames, OsmFeatureId, OsmNames, OutputFeature, ProcessContext, Profile, Transit,
};
use clap::Parser;
use hashbrown::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

mod output;
mod pbf;

use output::write_features_geojson;
use pbf::classify_nodes;

#[derive(Parser, Debug)]
#[command(
    name = "osm-transit",
    author,
    version,
    about = "Extract transit layer point features from OpenStreetMap PBF data",
    long_about = "Classifies OSM nodes into the basemap `transit` layer: pedestrian \
                  crossings (highway=crossing) and bike barriers (barrier=cycle_barrier, \
                  bollard, chicane). Features visible at the chosen zoom are written \
                  as GeoJSON with their derived attributes."
)]
struct Args {
    /// Input OSM PBF file
    #[arg(short, long)]
    input: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long)]
    output: PathBuf,

    /// Zoom level to finish features at (drops features not yet visible)
    #[arg(short, long, default_value_t = 16)]
    zoom: u8,

    /// Only keep these name:<lang> translations (comma-separated)
    #[arg(long, value_delimiter = ',', conflicts_with = "no_names")]
    languages: Vec<String>,

    /// Do not add name attributes
    #[arg(long)]
    no_names: bool,

    /// Pretty-print the GeoJSON output
    #[arg(long)]
    pretty: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn name_resolver(&self) -> Arc<dyn NameResolver> {
        if self.no_names {
            Arc::new(NoNames)
        } else if self.languages.is_empty() {
            Arc::new(OsmNames::new())
        } else {
            Arc::new(OsmNames::with_languages(self.languages.iter().cloned()))
        }
    }
}

/// Per-kind summary of the written features
#[derive(Default)]
struct LayerStats {
    by_kind: HashMap<(&'static str, String), usize>,
}

impl LayerStats {
    fn collect(features: &[OutputFeature]) -> Self {
        let mut stats = Self::default();
        for feature in features {
            let kind = feature.kind().unwrap_or("<none>").to_string();
            *stats.by_kind.entry((feature.layer(), kind)).or_default() += 1;
        }
        stats
    }

    fn log_summary(&self) {
        log::info!("=== Summary ===");
        if self.by_kind.is_empty() {
            log::info!("  No features written");
            return;
        }
        let mut rows: Vec<_> = self.by_kind.iter().collect();
        rows.sort();
        for ((layer, kind), count) in rows {
            log::info!("  {}/{}: {}", layer, kind, count);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("=== OSM Transit Layer ===");
    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output.display());
    log::info!("Zoom: {}", args.zoom);

    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }
    if args.zoom > MAX_ZOOM {
        bail!("Zoom {} is above the maximum of {}", args.zoom, MAX_ZOOM);
    }

    let context = ProcessContext::new(Arc::new(OsmFeatureId), args.name_resolver());
    let profile = Profile::new(context)
        .with_layer(Transit::new().context("Failed to build transit layer")?)?;

    // Phase 1: Classify nodes
    log::info!("");
    log::info!("Phase 1: Classifying nodes...");
    let batch = classify_nodes(&args.input, &profile).context("Failed to classify PBF nodes")?;

    // Phase 2: Post-process
    log::info!("");
    log::info!("Phase 2: Post-processing at z{}...", args.zoom);
    let emitted = batch.features.len();
    let features = profile
        .finish_zoom(args.zoom, batch.features)
        .context("Post-processing failed")?;
    log::info!("  {} of {} features visible at z{}", features.len(), emitted, args.zoom);

    // Phase 3: Write output
    log::info!("");
    log::info!("Phase 3: Writing output...");
    write_features_geojson(&features, args.zoom, &args.output, args.pretty)
        .context("Failed to write transit GeoJSON")?;

    log::info!("");
    LayerStats::collect(&features).log_summary();
    log::info!("");
    log::info!("Output written to: {}", args.output.display());
    log::info!("Done!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use basemap_layers::SourceFeature;
    use clap::CommandFactory;
    use geo::Point;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["osm-transit", "-i", "in.pbf", "-o", "out.geojson"]);
        assert_eq!(args.zoom, 16);
        assert!(args.languages.is_empty());
        assert!(!args.no_names);
    }

    #[test]
    fn test_languages_list() {
        let args = Args::parse_from([
            "osm-transit", "-i", "in.pbf", "-o", "out.geojson", "--languages", "en,de",
        ]);
        assert_eq!(args.languages, vec!["en", "de"]);

        let conflict = Args::try_parse_from([
            "osm-transit", "-i", "in.pbf", "-o", "out.geojson", "--languages", "en", "--no-names",
        ]);
        assert!(conflict.is_err());
    }

    #[test]
    fn test_layer_stats() {
        let profile = Profile::new(ProcessContext::default())
            .with_layer(Transit::new().unwrap())
            .unwrap();
        let sf = SourceFeature::osm_node(
            Point::new(0.0, 0.0),
            [("highway", "crossing"), ("barrier", "bollard")],
            1,
        );
        let features = profile.process(&sf).unwrap();

        let stats = LayerStats::collect(&features);
        assert_eq!(stats.by_kind.get(&("transit", "crossing".to_string())), Some(&1));
        assert_eq!(stats.by_kind.get(&("transit", "barrier".to_string())), Some(&1));
    }
}
