use std::fmt;

use crate::error::ModelSelectionError;

/// Similarity strategy used when no preferred model is installed verbatim.
/// The selector's control flow never depends on how candidates are scored, so
/// alternative metrics can be swapped in without touching it.
pub trait ModelScorer {
    /// Score `candidate` against `preferred`; zero means no match at all.
    fn score(&self, preferred: &str, candidate: &str) -> u8;
}

/// Strip a `:`-delimited variant suffix, e.g. `qwen3:14b` -> `qwen3`.
pub fn base_model_name(name: &str) -> &str {
    name.split_once(':').map_or(name, |(base, _)| base)
}

/// Default heuristic: compare base names after stripping variant suffixes.
/// Equality beats a prefix relation, which beats a substring relation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseNameScorer;

impl ModelScorer for BaseNameScorer {
    fn score(&self, preferred: &str, candidate: &str) -> u8 {
        let preferred = base_model_name(preferred);
        let candidate = base_model_name(candidate);
        if preferred == candidate {
            3
        } else if candidate.starts_with(preferred) || preferred.starts_with(candidate) {
            2
        } else if candidate.contains(preferred) || preferred.contains(candidate) {
            1
        } else {
            0
        }
    }
}

/// Why the selector settled on a model that was not an exact preferred match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionNote {
    ClosestMatch { preferred: String, chosen: String },
    NoPreferredInstalled { preferred: Vec<String>, chosen: String },
}

impl fmt::Display for SelectionNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionNote::ClosestMatch { preferred, chosen } => {
                write!(f, "using closest installed model {chosen} for preferred {preferred}")
            }
            SelectionNote::NoPreferredInstalled { preferred, chosen } => {
                write!(
                    f,
                    "none of the preferred models {preferred:?} are installed; using {chosen} instead"
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub model: String,
    pub note: Option<SelectionNote>,
}

impl Selection {
    fn plain(model: impl Into<String>) -> Self {
        Self { model: model.into(), note: None }
    }
}

/// Resolve which model to address.
///
/// `catalog` is the outcome of the `/api/tags` query: `None` when the query
/// failed, `Some` with whatever it returned otherwise. Resolution order is
/// explicit choice, then exact preferred match, then closest preferred match,
/// then first available model; an operator's explicit choice is never
/// validated against the catalog.
pub fn select_model(
    explicit: Option<&str>,
    preferred: &[String],
    catalog: Option<&[String]>,
    scorer: &dyn ModelScorer,
) -> Result<Selection, ModelSelectionError> {
    if let Some(model) = explicit
        && !model.trim().is_empty()
    {
        return Ok(Selection::plain(model.trim()));
    }

    let Some(catalog) = catalog.filter(|models| !models.is_empty()) else {
        let Some(first) = preferred.first() else {
            return Err(ModelSelectionError::NoPreferredModels);
        };
        return Ok(Selection::plain(first.clone()));
    };

    for name in preferred {
        if catalog.iter().any(|candidate| candidate == name) {
            return Ok(Selection::plain(name.clone()));
        }
    }

    for name in preferred {
        if let Some(chosen) = closest_model(name, catalog, scorer) {
            return Ok(Selection {
                model: chosen.clone(),
                note: Some(SelectionNote::ClosestMatch {
                    preferred: name.clone(),
                    chosen: chosen.clone(),
                }),
            });
        }
    }

    let fallback = catalog[0].clone();
    Ok(Selection {
        model: fallback.clone(),
        note: Some(SelectionNote::NoPreferredInstalled {
            preferred: preferred.to_vec(),
            chosen: fallback,
        }),
    })
}

/// Strictly-highest positive score wins; ties keep the earlier catalog entry.
fn closest_model<'a>(
    preferred: &str,
    catalog: &'a [String],
    scorer: &dyn ModelScorer,
) -> Option<&'a String> {
    let mut best = None;
    let mut best_score = 0u8;
    for candidate in catalog {
        let score = scorer.score(preferred, candidate);
        if score > best_score {
            best = Some(candidate);
            best_score = score;
        }
    }
    best
}
