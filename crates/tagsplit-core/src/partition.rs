//! Splitting one Swagger document into per-tag scoped documents.
//!
//! Every path is assigned to exactly one group: the tag of its first
//! declared operation, or [`FALLBACK_TAG`] when that operation carries no
//! tags. Groups appear in the order their tag was first seen and keep the
//! relative order of their paths.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::PartitionError;
use crate::parse::operation::PathItem;
use crate::parse::spec::SwaggerDocument;

/// Group name for paths whose first operation has no tags.
pub const FALLBACK_TAG: &str = "NotTaggedEndpoints";

/// One path assigned to a group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedPath {
    pub path_name: String,
    pub path_item: PathItem,
    /// Capitalized tag of the owning group.
    pub tag: String,
}

/// All paths sharing one first-tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TagGroup {
    /// Tag exactly as written in the document.
    pub raw_tag: String,
    pub paths: Vec<GroupedPath>,
}

impl TagGroup {
    /// Capitalized tag, used as the client class name.
    pub fn class_name(&self) -> String {
        capitalize_first(&self.raw_tag)
    }
}

/// A copy of the input document restricted to one group's paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedSpec {
    pub class_name: String,
    pub document: SwaggerDocument,
}

/// Upper-case the first character when it is an ASCII letter. Anything else
/// is returned unchanged.
pub fn capitalize_first(s: &str) -> String {
    let mut out = s.to_string();
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    out
}

/// Tag of the first declared operation of `item`.
pub fn classify_path(path: &str, item: &PathItem) -> Result<String, PartitionError> {
    let (method, operation) = item.first_operation().ok_or_else(|| {
        PartitionError::InvalidSpecification(format!("path `{path}` declares no operations"))
    })?;

    let first_tag = match operation.get("tags") {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Array(tags)) => tags.first(),
        Some(_) => {
            return Err(PartitionError::InvalidSpecification(format!(
                "`tags` of {method} {path} must be a list"
            )));
        }
    };

    match first_tag {
        None | Some(serde_json::Value::Null) => Ok(FALLBACK_TAG.to_string()),
        Some(serde_json::Value::String(tag)) if tag.is_empty() => Ok(FALLBACK_TAG.to_string()),
        Some(serde_json::Value::String(tag)) => Ok(tag.clone()),
        Some(other) => Err(PartitionError::InvalidSpecification(format!(
            "first tag of {method} {path} must be a string, found {other}"
        ))),
    }
}

/// Fold the document's paths into an insertion-ordered map from raw tag to
/// the paths carrying it.
pub fn accumulate_by_tag(
    doc: &SwaggerDocument,
) -> Result<IndexMap<String, Vec<(String, PathItem)>>, PartitionError> {
    doc.paths.iter().try_fold(
        IndexMap::new(),
        |mut acc: IndexMap<String, Vec<(String, PathItem)>>, (path, item)| {
            let tag = classify_path(path, item)?;
            log::debug!("{path} → {tag}");
            acc.entry(tag)
                .or_default()
                .push((path.clone(), item.clone()));
            Ok(acc)
        },
    )
}

/// Group the document's paths by first tag.
pub fn group_paths_by_tag(doc: &SwaggerDocument) -> Result<Vec<TagGroup>, PartitionError> {
    let groups = accumulate_by_tag(doc)?
        .into_iter()
        .map(|(raw_tag, paths)| {
            let paths = paths
                .into_iter()
                .map(|(path_name, path_item)| GroupedPath {
                    path_name,
                    path_item,
                    tag: capitalize_first(&raw_tag),
                })
                .collect();
            TagGroup { raw_tag, paths }
        })
        .collect();
    Ok(groups)
}

/// Class names become file names, so they must stay a single path component.
fn check_class_name(group: &TagGroup) -> Result<(), PartitionError> {
    let name = group.class_name();
    if name.contains(['/', '\\', '\0']) || name.contains("..") {
        return Err(PartitionError::InvalidSpecification(format!(
            "tag `{}` cannot be used as a client name",
            group.raw_tag.escape_debug()
        )));
    }
    Ok(())
}

/// Reject unusable class names, and groups whose raw tags differ but whose
/// class names do not.
pub fn check_groups(groups: &[TagGroup]) -> Result<(), PartitionError> {
    let mut seen: IndexMap<String, &str> = IndexMap::new();
    for group in groups {
        check_class_name(group)?;
        match seen.entry(group.class_name()) {
            Entry::Occupied(existing) => {
                return Err(PartitionError::AmbiguousTagCollision {
                    class_name: existing.key().clone(),
                    first: existing.get().to_string(),
                    second: group.raw_tag.clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(&group.raw_tag);
            }
        }
    }
    Ok(())
}

/// Split `doc` into one scoped document per tag group.
pub fn partition(doc: &SwaggerDocument) -> Result<Vec<ScopedSpec>, PartitionError> {
    let groups = group_paths_by_tag(doc)?;
    check_groups(&groups)?;

    let scoped = groups
        .into_iter()
        .map(|group| {
            let class_name = group.class_name();
            log::debug!("group {class_name}: {} paths", group.paths.len());
            let paths = group
                .paths
                .into_iter()
                .map(|p| (p.path_name, p.path_item))
                .collect();
            ScopedSpec {
                class_name,
                document: doc.with_paths(paths),
            }
        })
        .collect();
    Ok(scoped)
}
