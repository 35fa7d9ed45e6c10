//! Rules for carrying sample labels over to unsampled points.

use crate::index::Neighbour;

/// Criterion used to pick the sample neighbour an unsampled point inherits
/// its label from. Only neighbours strictly denser than the point qualify.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExtensionRule {
    /// Inherit from the densest qualifying neighbour; ties keep the closer.
    #[default]
    DensestNeighbour,
    /// Inherit from the closest qualifying neighbour.
    NearestDenserNeighbour,
}

/// What to do when no sample neighbour is denser than the unsampled point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExtensionFallback {
    /// Report [`crate::QuickShiftError::UnresolvedExtension`].
    #[default]
    Fail,
    /// Inherit from the nearest sample neighbour regardless of density.
    NearestSample,
}

/// Sample neighbour chosen for an unsampled point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ExtensionTarget {
    /// Position of the neighbour within the sample.
    pub(crate) position: usize,
    /// Whether the fallback picked the neighbour.
    pub(crate) fell_back: bool,
}

/// Candidate view shared by the rules: sample neighbours of `point` mapped
/// back to dataset indices, with the point itself removed.
pub(crate) struct Candidates<'a> {
    pub(crate) point: usize,
    pub(crate) neighbours: &'a [Neighbour],
    pub(crate) members: &'a [usize],
    pub(crate) densities: &'a [f32],
}

impl Candidates<'_> {
    fn others(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.neighbours.iter().filter_map(|neighbour| {
            let index = *self.members.get(neighbour.id)?;
            if index == self.point {
                return None;
            }
            let density = *self.densities.get(index)?;
            Some((neighbour.id, density))
        })
    }

    fn own_density(&self) -> f32 {
        self.densities
            .get(self.point)
            .copied()
            .unwrap_or(f32::INFINITY)
    }

    /// Applies `rule`, then `fallback` when no neighbour qualifies.
    pub(crate) fn select(
        &self,
        rule: ExtensionRule,
        fallback: ExtensionFallback,
    ) -> Option<ExtensionTarget> {
        let own = self.own_density();
        let mut denser = self.others().filter(|&(_, density)| density > own);
        let chosen = match rule {
            ExtensionRule::DensestNeighbour => denser
                .fold(None, |best: Option<(usize, f32)>, (position, density)| {
                    match best {
                        Some((_, best_density)) if best_density >= density => best,
                        _ => Some((position, density)),
                    }
                })
                .map(|(position, _)| position),
            ExtensionRule::NearestDenserNeighbour => denser.next().map(|(position, _)| position),
        };
        match (chosen, fallback) {
            (Some(position), _) => Some(ExtensionTarget {
                position,
                fell_back: false,
            }),
            (None, ExtensionFallback::Fail) => None,
            (None, ExtensionFallback::NearestSample) => {
                self.others().next().map(|(position, _)| ExtensionTarget {
                    position,
                    fell_back: true,
                })
            }
        }
    }
}
