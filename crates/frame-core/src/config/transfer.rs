//! Validated transfer specifications

use std::path::PathBuf;

use frame_filters::{GlobalStage, LocalStage, NamePattern, SamplerParams};

use super::manifest::{GlobalStageSection, LocalStageSection, TransferSection};
use crate::Result;

/// One configured subtree plus its filter pipeline.
///
/// Local stages run at every directory of the walk, global stages once over
/// everything the walk collected. Both run in listed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSpec {
    pub path: PathBuf,
    pub local: Vec<LocalStage>,
    pub global: Vec<GlobalStage>,
}

impl TransferSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            local: Vec::new(),
            global: Vec::new(),
        }
    }

    pub fn with_local(mut self, stage: LocalStage) -> Self {
        self.local.push(stage);
        self
    }

    pub fn with_global(mut self, stage: GlobalStage) -> Self {
        self.global.push(stage);
        self
    }
}

impl TryFrom<TransferSection> for TransferSpec {
    type Error = crate::Error;

    fn try_from(section: TransferSection) -> Result<Self> {
        let local = section
            .local
            .into_iter()
            .map(local_stage)
            .collect::<Result<Vec<_>>>()?;
        let global = section
            .global
            .into_iter()
            .map(global_stage)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            path: section.path,
            local,
            global,
        })
    }
}

fn pattern(source: Option<String>) -> Result<Option<NamePattern>> {
    source
        .map(|s| NamePattern::new(&s))
        .transpose()
        .map_err(Into::into)
}

fn local_stage(section: LocalStageSection) -> Result<LocalStage> {
    Ok(match section {
        LocalStageSection::PathPattern { dir, file } => LocalStage::PathPattern {
            dir: pattern(dir)?,
            file: pattern(file)?,
        },
        LocalStageSection::Curation {} => LocalStage::Curation,
    })
}

fn global_stage(section: GlobalStageSection) -> Result<GlobalStage> {
    Ok(match section {
        GlobalStageSection::Recent { pick } => GlobalStage::Recent { pick },
        GlobalStageSection::Sample {
            pick,
            interval,
            slices,
        } => GlobalStage::Sample(SamplerParams::new(pick.unwrap_or(0), interval, slices)?),
    })
}
