use anyhow::{Context, Result};
use basemap_layers::{LayerError, OutputFeature, Profile, SourceFeature};
use geo::Point;
use indicatif::{ProgressBar, ProgressStyle};
use osmpbf::{Element, ElementReader};
use std::path::Path;
use std::time::Duration;

/// Output of classifying one or more PBF blocks
#[derive(Default)]
pub struct Batch {
    pub features: Vec<OutputFeature>,
    pub node_count: u64,
    pub tagged_node_count: u64,
    pub way_count: u64,
    pub relation_count: u64,
}

impl Batch {
    fn merge(&mut self, other: Batch) {
        self.features.extend(other.features);
        self.node_count += other.node_count;
        self.tagged_node_count += other.tagged_node_count;
        self.way_count += other.way_count;
        self.relation_count += other.relation_count;
    }

    /// Restore a stable order after an unordered parallel reduce
    fn sort_by_id(&mut self) {
        self.features.sort_by_key(|f| f.id());
    }
}

/// Build a source feature from a node, skipping untagged ones
fn node_feature<'a>(
    id: i64,
    lon: f64,
    lat: f64,
    tags: impl Iterator<Item = (&'a str, &'a str)>,
) -> Option<SourceFeature> {
    let mut tags = tags.peekable();
    tags.peek()?;
    Some(SourceFeature::osm_node(Point::new(lon, lat), tags, id))
}

fn classify_node<'a>(
    profile: &Profile,
    id: i64,
    lon: f64,
    lat: f64,
    tags: impl Iterator<Item = (&'a str, &'a str)>,
) -> std::result::Result<Batch, LayerError> {
    let mut batch = Batch {
        node_count: 1,
        ..Batch::default()
    };

    if let Some(source) = node_feature(id, lon, lat, tags) {
        batch.tagged_node_count += 1;
        batch.features = profile.process(&source)?;
    }

    Ok(batch)
}

fn classify_element(profile: &Profile, element: Element) -> std::result::Result<Batch, LayerError> {
    match element {
        Element::Node(node) => {
            classify_node(profile, node.id(), node.lon(), node.lat(), node.tags())
        }
        Element::DenseNode(node) => {
            classify_node(profile, node.id(), node.lon(), node.lat(), node.tags())
        }
        Element::Way(_) => Ok(Batch {
            way_count: 1,
            ..Batch::default()
        }),
        Element::Relation(_) => Ok(Batch {
            relation_count: 1,
            ..Batch::default()
        }),
    }
}

/// Run every node of a PBF file through the profile, in parallel.
///
/// Features are returned ordered by id so output is identical across runs.
pub fn classify_nodes(path: &Path, profile: &Profile) -> Result<Batch> {
    log::info!("Reading PBF file: {}", path.display());

    let reader = ElementReader::from_path(path)
        .with_context(|| format!("Failed to open PBF file: {}", path.display()))?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .context("Invalid progress template")?,
    );
    pb.set_message("Classifying nodes...");
    pb.enable_steady_tick(Duration::from_millis(120));

    let batch = reader
        .par_map_reduce(
            |element| classify_element(profile, element),
            || Ok(Batch::default()),
            |a, b| match (a, b) {
                (Ok(mut a), Ok(b)) => {
                    a.merge(b);
                    Ok(a)
                }
                (Err(e), _) | (_, Err(e)) => Err(e),
            },
        )
        .with_context(|| format!("Failed to read PBF file: {}", path.display()))?
        .context("Failed to classify node")?;

    let mut batch = batch;
    batch.sort_by_id();

    pb.finish_with_message(format!(
        "Processed {} nodes, {} ways, {} relations",
        batch.node_count, batch.way_count, batch.relation_count
    ));

    log::info!("Tagged nodes: {}", batch.tagged_node_count);
    log::info!("Features emitted: {}", batch.features.len());
    if batch.way_count > 0 || batch.relation_count > 0 {
        log::debug!(
            "Skipped {} ways and {} relations (point layers only)",
            batch.way_count,
            batch.relation_count
        );
    }

    Ok(batch)
}
