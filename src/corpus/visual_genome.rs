//! Visual Genome corpus builder
//!
//! Joins the three position-aligned Visual Genome dumps (`image_data.json`,
//! `region_graphs.json`, `attributes.json`) into region graphs. Images are
//! parsed in indexed chunks on blocking workers; chunks are re-assembled
//! in index order so the output order never depends on scheduling.

use super::{CorpusError, CorpusResult, RegionGraph};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct ImageRecord {
    #[serde(default)]
    pub image_id: Option<u64>,
    #[serde(default)]
    pub coco_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRegions {
    #[serde(default)]
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub phrase: String,
    #[serde(default)]
    pub objects: Vec<RegionObject>,
    #[serde(default)]
    pub relationships: Vec<RegionRelationship>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionObject {
    pub object_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub names: Vec<String>,
}

impl RegionObject {
    /// `name`, or the first of `names` in dumps that only carry the list
    fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.names.first().map(String::as_str))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionRelationship {
    pub subject_id: u64,
    pub object_id: u64,
    pub predicate: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageAttributes {
    #[serde(default)]
    pub attributes: Vec<ObjectAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectAttributes {
    pub object_id: u64,
    #[serde(default)]
    pub attributes: Option<Vec<String>>,
}

/// Locations of the three Visual Genome dumps
#[derive(Debug, Clone)]
pub struct VisualGenomeSources {
    pub image_data: PathBuf,
    pub region_graphs: PathBuf,
    pub attributes: PathBuf,
}

impl VisualGenomeSources {
    /// The standard file names inside a Visual Genome data directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            image_data: dir.join("image_data.json"),
            region_graphs: dir.join("region_graphs.json"),
            attributes: dir.join("attributes.json"),
        }
    }
}

/// Builds region-graph corpora from Visual Genome dumps
#[derive(Debug, Clone)]
pub struct VisualGenomeBuilder {
    coco_only: bool,
    workers: usize,
}

impl Default for VisualGenomeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualGenomeBuilder {
    /// Builder keeping only COCO images, with one worker per CPU
    pub fn new() -> Self {
        Self {
            coco_only: true,
            workers: std::thread::available_parallelism().map_or(4, |n| n.get()),
        }
    }

    /// Keep or drop images without a COCO id
    pub fn with_coco_only(mut self, coco_only: bool) -> Self {
        self.coco_only = coco_only;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Load the three dumps and build the corpus
    pub async fn build(&self, sources: &VisualGenomeSources) -> CorpusResult<Vec<RegionGraph>> {
        let sources = sources.clone();
        let (images, regions, attributes) = tokio::task::spawn_blocking(move || {
            Ok::<_, CorpusError>((
                load_json::<Vec<ImageRecord>>(&sources.image_data)?,
                load_json::<Vec<ImageRegions>>(&sources.region_graphs)?,
                load_json::<Vec<ImageAttributes>>(&sources.attributes)?,
            ))
        })
        .await??;

        self.build_from(images, regions, attributes).await
    }

    /// Build the corpus from already-parsed dumps, aligned by position
    pub async fn build_from(
        &self,
        images: Vec<ImageRecord>,
        regions: Vec<ImageRegions>,
        attributes: Vec<ImageAttributes>,
    ) -> CorpusResult<Vec<RegionGraph>> {
        let total = images.len();
        if regions.len() != total || attributes.len() != total {
            warn!(
                images = total,
                regions = regions.len(),
                attributes = attributes.len(),
                "dump lengths differ, extra entries are ignored"
            );
        }
        let kept: Vec<(ImageRegions, ImageAttributes)> = images
            .into_iter()
            .zip(regions)
            .zip(attributes)
            .filter(|((image, _), _)| !self.coco_only || image.coco_id.is_some())
            .map(|((_, regions), attributes)| (regions, attributes))
            .collect();
        let skipped = total - kept.len();

        let chunk_size = kept.len().div_ceil(self.workers).max(1);
        let mut pending = kept.into_iter();
        let mut tasks = JoinSet::new();
        let mut index = 0usize;
        loop {
            let chunk: Vec<_> = pending.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            tasks.spawn_blocking(move || {
                let graphs: Vec<RegionGraph> = chunk
                    .into_iter()
                    .flat_map(|(regions, attributes)| image_region_graphs(regions, attributes))
                    .collect();
                (index, graphs)
            });
            index += 1;
        }

        let mut chunks = Vec::with_capacity(index);
        while let Some(joined) = tasks.join_next().await {
            chunks.push(joined?);
        }
        chunks.sort_by_key(|(index, _)| *index);

        let graphs: Vec<RegionGraph> = chunks.into_iter().flat_map(|(_, graphs)| graphs).collect();
        info!(
            images = total,
            skipped_images = skipped,
            region_graphs = graphs.len(),
            "built Visual Genome corpus"
        );
        Ok(graphs)
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> CorpusResult<T> {
    let file = File::open(path).map_err(|e| CorpusError::io(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Region graphs of one image.
///
/// Skips regions with a blank phrase, with no objects, or repeating the
/// phrase of the previously kept region.
pub fn image_region_graphs(regions: ImageRegions, attributes: ImageAttributes) -> Vec<RegionGraph> {
    let object_attributes: HashMap<u64, Vec<String>> = attributes
        .attributes
        .into_iter()
        .filter_map(|entry| entry.attributes.map(|words| (entry.object_id, words)))
        .collect();

    let mut graphs: Vec<RegionGraph> = Vec::new();
    for region in regions.regions {
        if region.phrase.trim().is_empty() || region.objects.is_empty() {
            continue;
        }
        if graphs.last().is_some_and(|prev| prev.phrase == region.phrase) {
            continue;
        }

        let mut graph = RegionGraph::new(region.phrase.clone());
        let mut names: HashMap<u64, String> = HashMap::new();

        for object in &region.objects {
            let Some(name) = object.display_name() else {
                warn!(object_id = object.object_id, "object without a name");
                continue;
            };
            names.insert(object.object_id, name.to_string());
            graph.objects.push(name.to_string());
            if let Some(words) = object_attributes.get(&object.object_id) {
                graph.attributes.push((name.to_string(), words.clone()));
            }
        }

        for rel in &region.relationships {
            match (names.get(&rel.subject_id), names.get(&rel.object_id)) {
                (Some(subject), Some(object)) => graph.relationships.push((
                    subject.clone(),
                    rel.predicate.clone(),
                    object.clone(),
                )),
                _ => warn!(
                    subject_id = rel.subject_id,
                    object_id = rel.object_id,
                    phrase = %region.phrase,
                    "relationship references an unknown object"
                ),
            }
        }

        graphs.push(graph);
    }
    graphs
}
