//! Recombination between two nodes of the same generation.
//!
//! A recombination exchanges one contiguous region of
//! payload between the two nodes and records, on both,
//! the partner and the half-open region. Ancestry for
//! sites inside the region is then attributed to the
//! partner's parent; see [`Genealogy::parent_for_site`].

use rand::Rng;

use crate::error::{GenealogyError, Result};
use crate::genealogy::{Genealogy, Recombination};
use crate::payload::Payload;
use crate::rng::SimulationRng;
use crate::Node;
use crate::Segment;

/// What a call to [`Genealogy::recombine`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecombinationEvent {
    /// The interior breakpoint.
    pub site: usize,
    /// `true` if the region above `site` was exchanged.
    pub upper: bool,
    /// The exchanged region.
    pub breakpoints: Segment,
}

impl<P: Payload> Genealogy<P> {
    /// Recombine `one` and `two`.
    ///
    /// A breakpoint is drawn uniformly from the interior sites
    /// `1..L`, where `L` is the last index of the shorter payload,
    /// followed by a fair coin deciding whether the region above
    /// or below the breakpoint is exchanged. Neither the first
    /// nor the last index can be drawn.
    ///
    /// # Errors
    ///
    /// Nothing is modified if an error is returned.
    ///
    /// * [`GenealogyError::InvalidNode`] if a node is not live.
    /// * [`GenealogyError::SelfRecombination`] if `one == two`.
    /// * [`GenealogyError::AlreadyRecombined`] if either node has
    ///   a recombination partner.
    /// * [`GenealogyError::PayloadTooShort`] if the shorter payload
    ///   has no interior site.
    pub fn recombine(
        &mut self,
        one: Node,
        two: Node,
        rng: &mut SimulationRng,
    ) -> Result<RecombinationEvent> {
        let length = self.validate_recombination(one, two)?;
        let last = length - 1;
        let site = rng.gen_range(1..last);
        let upper = rng.gen_bool(0.5);
        let breakpoints = if upper {
            Segment::new(site, length)
        } else {
            Segment::new(0, site)
        }
        .ok_or(GenealogyError::PayloadTooShort { length })?;
        self.exchange(one, two, breakpoints);
        let event = RecombinationEvent {
            site,
            upper,
            breakpoints,
        };
        log::debug!("recombined {one:?} and {two:?}: {event:?}");
        Ok(event)
    }

    /// Recombine `one` and `two` over a given region.
    ///
    /// Same as [`Genealogy::recombine`], except that the region
    /// is chosen by the caller. This is useful to replay recorded
    /// events.
    ///
    /// # Errors
    ///
    /// As for [`Genealogy::recombine`]. In addition,
    /// [`GenealogyError::PayloadTooShort`] if `breakpoints`
    /// extends past the shorter payload.
    pub fn recombine_over(&mut self, one: Node, two: Node, breakpoints: Segment) -> Result<()> {
        let length = self.validate_recombination(one, two)?;
        if breakpoints.right() > length {
            return Err(GenealogyError::PayloadTooShort { length });
        }
        self.exchange(one, two, breakpoints);
        log::debug!("recombined {one:?} and {two:?} over {breakpoints:?}");
        Ok(())
    }

    // Returns the shorter payload length.
    fn validate_recombination(&self, one: Node, two: Node) -> Result<usize> {
        self.validate(one)?;
        self.validate(two)?;
        if one == two {
            return Err(GenealogyError::SelfRecombination { node: one });
        }
        for node in [one, two] {
            if let Some(partner) = self.recombination_partner(node) {
                return Err(GenealogyError::AlreadyRecombined { node, partner });
            }
        }
        let length = std::cmp::min(self.payload(one).len(), self.payload(two).len());
        if length < 3 {
            return Err(GenealogyError::PayloadTooShort { length });
        }
        Ok(length)
    }

    fn exchange(&mut self, one: Node, two: Node, breakpoints: Segment) {
        self.set_recombination(one, Some(Recombination::new(two, breakpoints)));
        self.set_recombination(two, Some(Recombination::new(one, breakpoints)));

        let (lo, hi) = (breakpoints.left(), breakpoints.right());
        let region_one = self.payload(one).region(lo, hi);
        let region_two = self.payload(two).region(lo, hi);
        self.payload_mut(one).set_region(lo, hi, region_two);
        self.payload_mut(two).set_region(lo, hi, region_one);
    }
}
