//! Core resolution algorithm: breadth-first graph expansion with
//! memoized metadata queries, exclusion propagation, cycle detection,
//! and nearest-wins/highest-version conflict resolution.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use futures_util::stream::{self, StreamExt};

use jbasis_core::dependency::{Coordinate, Dependency};
use jbasis_core::repository::RepositoryEndpoint;
use jbasis_util::errors::BasisError;

use crate::cancel::CancellationFlag;
use crate::conflict::{ConflictReport, VersionConflict};
use crate::graph::{DependencyGraph, ResolvedNode};
use crate::provider::{ArtifactManifest, MetadataProvider};
use crate::version::MavenVersion;
use crate::visited::ExpansionGuard;

const MAX_CONCURRENT_FETCHES: usize = 8;

/// Options for a resolution run.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Cancellation signal checked between queue pops.
    pub cancel: CancellationFlag,
    /// Upper bound on concurrently issued metadata queries.
    pub max_concurrent_fetches: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            cancel: CancellationFlag::new(),
            max_concurrent_fetches: MAX_CONCURRENT_FETCHES,
        }
    }
}

/// The output of dependency resolution.
#[derive(Debug)]
pub struct Resolution {
    /// Resolved artifacts in discovery order, exactly one per coordinate.
    pub artifacts: Vec<ResolvedArtifact>,
    /// Diagnostic graph over the resolved set.
    pub graph: DependencyGraph,
    /// Version requests overridden by the conflict policy.
    pub conflicts: ConflictReport,
}

/// A single resolved (coordinate, version) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub coordinate: Coordinate,
    pub version: String,
    /// Dependent that first introduced this artifact; `None` for roots.
    pub introduced_by: Option<Coordinate>,
}

impl Resolution {
    pub fn version_of(&self, coordinate: &Coordinate) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|a| &a.coordinate == coordinate)
            .map(|a| a.version.as_str())
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.version_of(coordinate).is_some()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Entry in the BFS expansion queue.
struct QueueEntry {
    dependency: Dependency,
    depth: usize,
    /// Coordinates along the path from a root to this entry, exclusive.
    ancestors: Vec<Coordinate>,
    /// Exclusions accumulated from ancestor declarations. The entry is
    /// dropped when its own coordinate is covered.
    inherited: BTreeSet<Coordinate>,
    /// The (coordinate, version) whose manifest declared this entry.
    parent: Option<(Coordinate, String)>,
}

/// One observed candidate version for a coordinate.
struct Candidate {
    version: String,
    depth: usize,
}

/// Resolve the transitive dependency set of `roots`.
///
/// Repositories are consulted in registry order through the provider.
/// Metadata is fetched at most once per unique (coordinate, version)
/// pair; pending queries within one BFS depth level run concurrently,
/// bounded by [`ResolveOptions::max_concurrent_fetches`].
///
/// Conflicts resolve deterministically: for each coordinate the version
/// first observed nearest the root wins, and ties at equal depth go to
/// the highest version under Maven version ordering. A coordinate
/// appearing in its own ancestor path fails with a `Conflict` error
/// rather than looping.
pub async fn resolve(
    roots: &[Dependency],
    repositories: &[RepositoryEndpoint],
    provider: &dyn MetadataProvider,
    options: &ResolveOptions,
) -> miette::Result<Resolution> {
    let mut queue: VecDeque<QueueEntry> = roots
        .iter()
        .map(|dep| QueueEntry {
            dependency: dep.clone(),
            depth: 0,
            ancestors: Vec::new(),
            inherited: BTreeSet::new(),
            parent: None,
        })
        .collect();

    // Candidate versions per coordinate, with first-observation depths.
    let mut candidates: HashMap<Coordinate, Vec<Candidate>> = HashMap::new();
    // Coordinates in first-observation order, for deterministic reports.
    let mut observed_order: Vec<Coordinate> = Vec::new();
    // Manifest per (coordinate, version): each pair is queried at most once.
    let mut memo: HashMap<(Coordinate, String), ArtifactManifest> = HashMap::new();
    // Surviving child pairs declared by each expanded pair, in pop order.
    let mut children: HashMap<(Coordinate, String), Vec<(Coordinate, String)>> = HashMap::new();
    let mut guard = ExpansionGuard::new();

    while !queue.is_empty() {
        if options.cancel.is_cancelled() {
            return Err(BasisError::Cancelled.into());
        }

        // Drain the current depth level from the front of the queue.
        let current_depth = queue.front().map(|e| e.depth).unwrap_or(0);
        let mut level: Vec<QueueEntry> = Vec::new();
        while queue.front().is_some_and(|e| e.depth == current_depth) {
            level.push(queue.pop_front().unwrap());
        }

        fetch_level(&level, repositories, provider, options, &mut memo).await?;

        for entry in level {
            if options.cancel.is_cancelled() {
                return Err(BasisError::Cancelled.into());
            }

            let coordinate = entry.dependency.coordinate.clone();
            let version = entry.dependency.version.clone();

            // Exclusions declared against any ancestor cover this whole
            // subtree, not just the immediate child.
            if let Some(excl) = excluded_by(&entry.inherited, &coordinate) {
                tracing::debug!("dropping {} (excluded by {excl})", entry.dependency);
                continue;
            }

            // A coordinate reached through itself means the metadata is
            // cyclic; short-circuit instead of expanding forever.
            if entry.ancestors.contains(&coordinate) {
                let mut cycle: Vec<String> = entry.ancestors.iter().map(|c| c.key()).collect();
                cycle.push(coordinate.key());
                return Err(BasisError::Conflict {
                    message: format!("dependency cycle: {}", cycle.join(" -> ")),
                }
                .into());
            }

            // Record the candidate observation. The first observation of
            // a version keeps its depth.
            let versions = candidates.entry(coordinate.clone()).or_insert_with(|| {
                observed_order.push(coordinate.clone());
                Vec::new()
            });
            if !versions.iter().any(|c| c.version == version) {
                versions.push(Candidate {
                    version: version.clone(),
                    depth: entry.depth,
                });
            }

            if let Some(ref parent) = entry.parent {
                let edges = children.entry(parent.clone()).or_default();
                let pair = (coordinate.clone(), version.clone());
                if !edges.contains(&pair) {
                    edges.push(pair);
                }
            }

            // This declaration's own exclusions join the inherited set
            // for everything below it.
            let mut subtree_exclusions = entry.inherited.clone();
            subtree_exclusions.extend(entry.dependency.exclusions().iter().cloned());

            // Identical (pair, exclusion context) subtrees expand once.
            if !guard.first_visit(&coordinate, &version, &subtree_exclusions) {
                continue;
            }

            let manifest = memo
                .get(&(coordinate.clone(), version.clone()))
                .expect("manifest prefetched for every surviving entry");

            let mut ancestors = entry.ancestors.clone();
            ancestors.push(coordinate.clone());

            for child in &manifest.dependencies {
                queue.push_back(QueueEntry {
                    dependency: child.clone(),
                    depth: entry.depth + 1,
                    ancestors: ancestors.clone(),
                    inherited: subtree_exclusions.clone(),
                    parent: Some((coordinate.clone(), version.clone())),
                });
            }
        }
    }

    // Conflict resolution runs only after expansion has fully completed.
    let (winners, conflicts) = pick_winners(&observed_order, &candidates);

    // Emit walk: follow only winning versions from the roots, so
    // subtrees introduced solely by losing candidates drop out. The walk
    // order is the resolved set's discovery order.
    let resolution = emit(roots, &winners, &children, conflicts);
    Ok(resolution)
}

/// Fetch all not-yet-memoized manifests for one depth level, with
/// bounded parallelism. Entries that will be dropped as excluded are
/// never queried.
async fn fetch_level(
    level: &[QueueEntry],
    repositories: &[RepositoryEndpoint],
    provider: &dyn MetadataProvider,
    options: &ResolveOptions,
    memo: &mut HashMap<(Coordinate, String), ArtifactManifest>,
) -> miette::Result<()> {
    let pending: Vec<(Coordinate, String)> = level
        .iter()
        .filter(|e| excluded_by(&e.inherited, &e.dependency.coordinate).is_none())
        .map(|e| {
            (
                e.dependency.coordinate.clone(),
                e.dependency.version.clone(),
            )
        })
        .filter(|pair| !memo.contains_key(pair))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    if pending.is_empty() {
        return Ok(());
    }

    tracing::debug!("fetching {} manifests at this level", pending.len());
    let mut fetches = stream::iter(pending.into_iter().map(|(coordinate, version)| async move {
        let manifest = provider.manifest(&coordinate, &version, repositories).await;
        ((coordinate, version), manifest)
    }))
    .buffer_unordered(options.max_concurrent_fetches.max(1));

    while let Some((pair, result)) = fetches.next().await {
        memo.insert(pair, result?);
    }
    Ok(())
}

fn excluded_by<'a>(
    exclusions: &'a BTreeSet<Coordinate>,
    coordinate: &Coordinate,
) -> Option<&'a Coordinate> {
    exclusions.iter().find(|excl| excl.covers(coordinate))
}

/// Apply the conflict policy: nearest to the root wins, ties at equal
/// depth go to the highest version. Every overridden request is
/// recorded in the report.
fn pick_winners(
    observed_order: &[Coordinate],
    candidates: &HashMap<Coordinate, Vec<Candidate>>,
) -> (HashMap<Coordinate, String>, ConflictReport) {
    let mut winners = HashMap::new();
    let mut conflicts = ConflictReport::new();

    for coordinate in observed_order {
        let observed = &candidates[coordinate];
        let winner = observed
            .iter()
            .min_by(|a, b| {
                a.depth.cmp(&b.depth).then_with(|| {
                    MavenVersion::parse(&b.version).cmp(&MavenVersion::parse(&a.version))
                })
            })
            .expect("every observed coordinate has at least one candidate");

        for candidate in observed {
            if candidate.version != winner.version {
                conflicts.record(VersionConflict {
                    coordinate: coordinate.clone(),
                    requested: candidate.version.clone(),
                    resolved: winner.version.clone(),
                    reason: if candidate.depth == winner.depth {
                        format!("highest version wins at depth {}", winner.depth)
                    } else {
                        format!("nearest wins (depth {} vs {})", winner.depth, candidate.depth)
                    },
                });
            }
        }
        winners.insert(coordinate.clone(), winner.version.clone());
    }

    (winners, conflicts)
}

/// Walk from the roots through winning versions only, emitting each
/// surviving coordinate once (first-discovered-first) and building the
/// diagnostic graph.
fn emit(
    roots: &[Dependency],
    winners: &HashMap<Coordinate, String>,
    children: &HashMap<(Coordinate, String), Vec<(Coordinate, String)>>,
    conflicts: ConflictReport,
) -> Resolution {
    let mut graph = DependencyGraph::new();
    let mut artifacts: Vec<ResolvedArtifact> = Vec::new();
    let mut emitted: HashSet<Coordinate> = HashSet::new();
    let mut walk: VecDeque<(Coordinate, Option<Coordinate>)> = VecDeque::new();

    for root in roots {
        // Roots always have a winner: depth 0 is minimal by definition.
        if winners.contains_key(&root.coordinate) {
            walk.push_back((root.coordinate.clone(), None));
        }
    }

    while let Some((coordinate, parent)) = walk.pop_front() {
        let version = winners[&coordinate].clone();

        if !emitted.insert(coordinate.clone()) {
            // Already emitted through an earlier discovery; just record
            // the extra edge for diagnostics.
            if let (Some(parent), Some(to)) = (&parent, graph.find(&coordinate)) {
                if let Some(from) = graph.find(parent) {
                    graph.add_edge(from, to);
                }
            }
            continue;
        }

        let node = graph.add_node(ResolvedNode {
            coordinate: coordinate.clone(),
            version: version.clone(),
        });
        match parent {
            Some(ref parent_coord) => {
                if let Some(from) = graph.find(parent_coord) {
                    graph.add_edge(from, node);
                }
            }
            None => graph.add_root(node),
        }

        artifacts.push(ResolvedArtifact {
            coordinate: coordinate.clone(),
            version: version.clone(),
            introduced_by: parent,
        });

        if let Some(edges) = children.get(&(coordinate.clone(), version)) {
            for (child, _requested) in edges {
                if winners.contains_key(child) {
                    walk.push_back((child.clone(), Some(coordinate.clone())));
                }
            }
        }
    }

    Resolution {
        artifacts,
        graph,
        conflicts,
    }
}
