use helix_core::{
    AnnotationResult, AntibodySequence, ChainRestriction, DualAnnotation, Scheme, Species,
};
use helix_formats::anarci;
use serde::Serialize;
use uuid::Uuid;

use crate::cache::AnnotationCache;
use crate::error::AnnotateError;
use crate::provider::{NumberingProvider, NumberingRequest};

const DEFAULT_BATCH_SIZE: usize = 50;

/// Annotates sequences by numbering them with a provider and grouping the
/// numbered residues into regions.
pub struct Annotator<'c, P> {
    provider: P,
    cache: Option<&'c AnnotationCache>,
    batch_size: usize,
}

/// A sequence annotated under both schemes.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedEntry {
    pub id: String,
    pub annotation: DualAnnotation,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedEntry {
    pub id: String,
    pub error: String,
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub annotated: Vec<AnnotatedEntry>,
    pub failed: Vec<FailedEntry>,
    /// Ids of entries that already carried a full annotation.
    pub skipped: Vec<String>,
}

impl<'c, P: NumberingProvider> Annotator<'c, P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Route provider calls through `cache`.
    pub fn with_cache(mut self, cache: &'c AnnotationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Chunk size for [`Annotator::annotate_batch`]; zero is treated as one.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Number one sequence under one scheme and group its residues by region.
    pub fn number(&self, request: &NumberingRequest) -> Result<AnnotationResult, AnnotateError> {
        let output = match self.cache {
            Some(cache) => cache.get_or_compute("number", &request.cache_args(), || {
                self.provider.number(request).map_err(AnnotateError::from)
            })?,
            None => self.provider.number(request)?,
        };

        let mut numbering = anarci::parse(&output)?;
        if let Some(announced) = numbering.metadata.scheme {
            if announced != request.scheme {
                tracing::warn!(
                    requested = %request.scheme,
                    announced = %announced,
                    "numbering tool reported a different scheme than requested"
                );
            }
        }
        numbering.metadata.tool_version = self.provider.tool_version();
        numbering.metadata.tool_source = self.provider.tool_source();

        Ok(AnnotationResult::from_numbering(&numbering, request.scheme)?)
    }

    /// Annotate under IMGT and Kabat.
    pub fn annotate(
        &self,
        sequence: &str,
        species: Option<Species>,
        restriction: Option<ChainRestriction>,
    ) -> Result<DualAnnotation, AnnotateError> {
        let request = |scheme| {
            NumberingRequest::new(sequence, scheme)
                .with_species(species)
                .with_restriction(restriction)
        };
        Ok(DualAnnotation {
            imgt: self.number(&request(Scheme::Imgt))?,
            kabat: self.number(&request(Scheme::Kabat))?,
        })
    }

    /// Annotate every entry that is not already fully annotated.
    ///
    /// A failing entry is recorded in the report and never stops the run.
    pub fn annotate_batch(&self, entries: &[AntibodySequence]) -> BatchReport {
        let mut report = BatchReport {
            run_id: Uuid::new_v4(),
            annotated: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        };
        let chunks = entries.len().div_ceil(self.batch_size);

        for (idx, chunk) in entries.chunks(self.batch_size).enumerate() {
            tracing::info!(
                run_id = %report.run_id,
                chunk = idx + 1,
                of = chunks,
                entries = chunk.len(),
                "annotating chunk"
            );

            for entry in chunk {
                if entry.is_fully_annotated() {
                    tracing::debug!(id = %entry.id, "already annotated, skipping");
                    report.skipped.push(entry.id.clone());
                    continue;
                }

                match self.annotate(&entry.residues, entry.species(), entry.chain_restriction()) {
                    Ok(annotation) => report.annotated.push(AnnotatedEntry {
                        id: entry.id.clone(),
                        annotation,
                    }),
                    Err(e) => {
                        tracing::warn!(id = %entry.id, error = %e, "annotation failed");
                        report.failed.push(FailedEntry {
                            id: entry.id.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            run_id = %report.run_id,
            annotated = report.annotated.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "batch finished"
        );
        report
    }
}
