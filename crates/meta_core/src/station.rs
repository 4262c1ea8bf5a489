//! Station group accumulation.
//!
//! A station group is positional: producers come before the control
//! generator, injectors after it, and a check generator with nonzero flow
//! closes the group. The accumulator consumes one generator at a time and
//! reports every transition through [`AddOutcome`].

use crate::error::StructuralError;
use crate::units::{to_tday, to_tday_rev};
use crate::{
    ControlSummary, GenerId, GenerRole, Generator, RoleClassifier, Scaling, StationGroup,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// No control generator seen yet; members are producers.
    Open,
    /// Control generator seen; members are injectors.
    Controlled,
    /// A check generator with nonzero flow was seen. Terminal.
    Closed,
}

/// What a single [`StationGroupAccumulator::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Producer,
    Injector,
    Control,
    /// `closes` is true when this check moved the group to [`GroupState::Closed`].
    Check { closes: bool },
}

#[derive(Debug, Clone)]
enum Phase {
    Open,
    Controlled,
    Closed { by: GenerId },
}

pub struct StationGroupAccumulator<'c> {
    classifier: &'c dyn RoleClassifier,
    phase: Phase,
    control: Option<Generator>,
    prd_geners: Vec<GenerId>,
    inj_geners: Vec<GenerId>,
    chk_geners: Vec<GenerId>,
}

impl<'c> StationGroupAccumulator<'c> {
    pub fn new(classifier: &'c dyn RoleClassifier) -> Self {
        Self {
            classifier,
            phase: Phase::Open,
            control: None,
            prd_geners: Vec::new(),
            inj_geners: Vec::new(),
            chk_geners: Vec::new(),
        }
    }

    pub fn add(&mut self, gener: &Generator) -> Result<AddOutcome, StructuralError> {
        match self.classifier.classify(gener) {
            GenerRole::Control => self.add_control(gener),
            GenerRole::Check => Ok(self.add_check(gener)),
            GenerRole::Other => self.add_member(gener),
        }
    }

    fn add_control(&mut self, gener: &Generator) -> Result<AddOutcome, StructuralError> {
        if let Some(existing) = &self.control {
            return Err(StructuralError::DuplicateControl {
                existing: existing.id(),
                duplicate: gener.id(),
            });
        }
        if let Phase::Closed { by } = &self.phase {
            return Err(StructuralError::AppendedAfterClose {
                closing: by.clone(),
                appended: gener.id(),
            });
        }
        self.control = Some(gener.clone());
        self.phase = Phase::Controlled;
        Ok(AddOutcome::Control)
    }

    // Checks are accepted in any state; only the first nonzero one closes.
    fn add_check(&mut self, gener: &Generator) -> AddOutcome {
        self.chk_geners.push(gener.id());
        let closes = gener.flow != 0.0 && !matches!(self.phase, Phase::Closed { .. });
        if closes {
            self.phase = Phase::Closed { by: gener.id() };
        }
        AddOutcome::Check { closes }
    }

    fn add_member(&mut self, gener: &Generator) -> Result<AddOutcome, StructuralError> {
        match &self.phase {
            Phase::Open => {
                self.prd_geners.push(gener.id());
                Ok(AddOutcome::Producer)
            }
            Phase::Controlled => {
                self.inj_geners.push(gener.id());
                Ok(AddOutcome::Injector)
            }
            Phase::Closed { by } => Err(StructuralError::AppendedAfterClose {
                closing: by.clone(),
                appended: gener.id(),
            }),
        }
    }

    pub fn state(&self) -> GroupState {
        match self.phase {
            Phase::Open => GroupState::Open,
            Phase::Controlled => GroupState::Controlled,
            Phase::Closed { .. } => GroupState::Closed,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state() == GroupState::Closed
    }

    /// A group is emittable once it has a control generator and is closed.
    pub fn is_valid(&self) -> bool {
        self.control.is_some() && self.is_closed()
    }

    pub fn is_empty(&self) -> bool {
        self.control.is_none()
            && self.prd_geners.is_empty()
            && self.inj_geners.is_empty()
            && self.chk_geners.is_empty()
    }

    /// Number of generators taken so far, control included.
    pub fn len(&self) -> usize {
        usize::from(self.control.is_some())
            + self.prd_geners.len()
            + self.inj_geners.len()
            + self.chk_geners.len()
    }

    /// The finished group, or `None` when the group is not valid.
    pub fn dump(self) -> Option<StationGroup> {
        if !self.is_valid() {
            return None;
        }
        let control = self.control?;
        Some(StationGroup {
            control_gener: control.id(),
            control: control_summary(&control),
            prd_geners: self.prd_geners,
            inj_geners: self.inj_geners,
            chk_geners: self.chk_geners,
        })
    }
}

impl std::fmt::Debug for StationGroupAccumulator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationGroupAccumulator")
            .field("state", &self.state())
            .field("control", &self.control.as_ref().map(Generator::id))
            .field("prd_geners", &self.prd_geners.len())
            .field("inj_geners", &self.inj_geners.len())
            .field("chk_geners", &self.chk_geners.len())
            .finish()
    }
}

pub fn control_summary(control: &Generator) -> ControlSummary {
    ControlSummary {
        name: control.id().to_string(),
        scaling: Scaling::from_magnitude(control.scaling),
        mass_target_tday: to_tday(control.mass_target),
        steam_target_tday: to_tday_rev(control.steam_target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{check, control, id, member};
    use crate::TagClassifier;

    fn feed<'c>(
        classifier: &'c TagClassifier,
        stream: &[Generator],
    ) -> Result<StationGroupAccumulator<'c>, StructuralError> {
        let mut acc = StationGroupAccumulator::new(classifier);
        for gener in stream {
            acc.add(gener)?;
        }
        Ok(acc)
    }

    #[test]
    fn producers_control_checks_make_one_group() {
        let classifier = TagClassifier::default();
        let stream = [
            member("aa 10", "A"),
            member("aa 11", "B"),
            control("tk 01", "tmkC", 10.0, 5.0, -2.0),
            check("ck 01", "chkK1", 0.0),
            check("ck 02", "chkK2", 5.0),
        ];
        let acc = feed(&classifier, &stream).unwrap();
        assert!(acc.is_valid());

        let group = acc.dump().unwrap();
        let summary = &group.control;
        assert_eq!(group.prd_geners, vec![id("aa 10", "A"), id("aa 11", "B")]);
        assert!(group.inj_geners.is_empty());
        assert_eq!(group.chk_geners, vec![id("ck 01", "chkK1"), id("ck 02", "chkK2")]);
        assert_eq!(group.control_gener, id("tk 01", "tmkC"));
        assert_eq!(summary.name, "tk 01:tmkC");
        assert_eq!(summary.scaling, Some(Scaling::Progressive));
        assert!((summary.mass_target_tday - 864.0).abs() < 1e-9);
        assert!((summary.steam_target_tday + 432.0).abs() < 1e-9);
    }

    #[test]
    fn member_after_control_is_an_injector() {
        let classifier = TagClassifier::default();
        let stream = [
            member("aa 10", "A"),
            control("tk 01", "tmkC", 10.0, 5.0, -2.0),
            member("aa 11", "B"),
            check("ck 01", "chkK1", 0.0),
            check("ck 02", "chkK2", 5.0),
        ];
        let group = feed(&classifier, &stream).unwrap().dump().unwrap();
        assert_eq!(group.prd_geners, vec![id("aa 10", "A")]);
        assert_eq!(group.inj_geners, vec![id("aa 11", "B")]);
        assert_eq!(group.chk_geners.len(), 2);
    }

    #[test]
    fn add_reports_each_transition() {
        let classifier = TagClassifier::default();
        let mut acc = StationGroupAccumulator::new(&classifier);
        assert_eq!(acc.state(), GroupState::Open);
        assert_eq!(acc.add(&member("aa 10", "A")), Ok(AddOutcome::Producer));
        assert_eq!(
            acc.add(&control("tk 01", "tmkC", 1.0, 1.0, 0.0)),
            Ok(AddOutcome::Control)
        );
        assert_eq!(acc.state(), GroupState::Controlled);
        assert_eq!(acc.add(&member("aa 11", "B")), Ok(AddOutcome::Injector));
        assert_eq!(
            acc.add(&check("ck 01", "chkK1", 0.0)),
            Ok(AddOutcome::Check { closes: false })
        );
        assert!(!acc.is_valid());
        assert_eq!(
            acc.add(&check("ck 02", "chkK2", -3.0)),
            Ok(AddOutcome::Check { closes: true })
        );
        assert_eq!(acc.state(), GroupState::Closed);
        assert!(acc.is_valid());
        assert_eq!(acc.len(), 5);
    }

    #[test]
    fn second_control_is_a_structural_error() {
        let classifier = TagClassifier::default();
        let stream = [
            control("tk 01", "tmkC1", 1.0, 1.0, 0.0),
            member("aa 10", "A"),
            control("tk 02", "tmkC2", 1.0, 1.0, 0.0),
        ];
        let err = feed(&classifier, &stream).unwrap_err();
        assert_eq!(
            err,
            StructuralError::DuplicateControl {
                existing: id("tk 01", "tmkC1"),
                duplicate: id("tk 02", "tmkC2"),
            }
        );
        let message = err.to_string();
        assert!(message.contains("tk 01:tmkC1"));
        assert!(message.contains("tk 02:tmkC2"));
    }

    #[test]
    fn member_after_close_is_a_structural_error() {
        let classifier = TagClassifier::default();
        let mut acc = feed(
            &classifier,
            &[
                control("tk 01", "tmkC", 1.0, 1.0, 0.0),
                check("ck 01", "chkK1", 2.0),
            ],
        )
        .unwrap();
        let err = acc.add(&member("aa 10", "late")).unwrap_err();
        assert_eq!(
            err,
            StructuralError::AppendedAfterClose {
                closing: id("ck 01", "chkK1"),
                appended: id("aa 10", "late"),
            }
        );
    }

    #[test]
    fn control_after_controlless_close_is_rejected() {
        let classifier = TagClassifier::default();
        let mut acc = feed(&classifier, &[check("ck 01", "chkK1", 2.0)]).unwrap();
        assert!(acc.is_closed());
        assert!(!acc.is_valid());
        let err = acc.add(&control("tk 01", "tmkC", 1.0, 1.0, 0.0)).unwrap_err();
        assert!(matches!(err, StructuralError::AppendedAfterClose { .. }));
    }

    #[test]
    fn checks_after_close_are_kept_without_reclosing() {
        let classifier = TagClassifier::default();
        let mut acc = feed(
            &classifier,
            &[
                control("tk 01", "tmkC", 1.0, 1.0, 0.0),
                check("ck 01", "chkK1", 2.0),
            ],
        )
        .unwrap();
        assert_eq!(
            acc.add(&check("ck 02", "chkK2", 7.0)),
            Ok(AddOutcome::Check { closes: false })
        );
        assert!(acc.is_valid());
        assert_eq!(acc.dump().unwrap().chk_geners.len(), 2);
    }

    #[test]
    fn scaling_boundaries() {
        assert_eq!(Scaling::from_magnitude(0.0), None);
        assert_eq!(Scaling::from_magnitude(3.5), None);
        assert_eq!(Scaling::from_magnitude(-0.5), Some(Scaling::Uniform));
        assert_eq!(Scaling::from_magnitude(-0.999), Some(Scaling::Uniform));
        assert_eq!(Scaling::from_magnitude(-1.0), Some(Scaling::Progressive));
        assert_eq!(Scaling::from_magnitude(-4.0), Some(Scaling::Progressive));
    }

    #[test]
    fn dump_is_none_until_valid() {
        let classifier = TagClassifier::default();
        let open = feed(&classifier, &[member("aa 10", "A")]).unwrap();
        assert!(open.dump().is_none());

        let unclosed = feed(
            &classifier,
            &[member("aa 10", "A"), control("tk 01", "tmkC", 1.0, 1.0, 0.0)],
        )
        .unwrap();
        assert!(unclosed.dump().is_none());

        let controlless = feed(
            &classifier,
            &[member("aa 10", "A"), check("ck 01", "chkK1", 2.0)],
        )
        .unwrap();
        assert!(controlless.is_closed());
        assert!(controlless.dump().is_none());
    }

    #[test]
    fn dump_serializes_control_fields() {
        let classifier = TagClassifier::default();
        let acc = feed(
            &classifier,
            &[
                control("tk 01", "tmkC", 2.0, 1.0, 1.0),
                check("ck 01", "chkK1", 1.0),
            ],
        )
        .unwrap();
        let json = serde_json::to_value(acc.dump().unwrap()).unwrap();
        assert_eq!(json["name"], "tk 01:tmkC");
        assert!(json["scaling"].is_null());
        assert_eq!(json["chk_geners"], serde_json::json!([["ck 01", "chkK1"]]));
    }
}
