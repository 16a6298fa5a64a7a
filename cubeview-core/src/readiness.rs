//
// ──────────────────────────────────────────────────────────────
//   Readiness
//
//   Rendering setup needs both a live surface and a loaded model.
//   The two arrive in either order; setup runs once on each entry
//   into `Ready`.
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Readiness
{
  #[default]
  AwaitingBoth,
  AwaitingSurface,
  AwaitingModel,
  Ready,
}

/// Result of a transition: the new state, and whether it just became `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition
{
  pub state: Readiness,
  pub entered_ready: bool,
}

impl Transition
{
  fn between(previous: Readiness, state: Readiness) -> Self
  {
    Self { state, entered_ready: state == Readiness::Ready && previous != Readiness::Ready }
  }
}

impl Readiness
{
  pub fn is_ready(self) -> bool
  {
    self == Readiness::Ready
  }

  pub fn has_model(self) -> bool
  {
    matches!(self, Readiness::AwaitingSurface | Readiness::Ready)
  }

  pub fn surface_realized(self) -> Transition
  {
    let next = match self
    {
      Readiness::AwaitingBoth => Readiness::AwaitingModel,
      Readiness::AwaitingSurface => Readiness::Ready,
      other => other,
    };

    Transition::between(self, next)
  }

  pub fn model_loaded(self) -> Transition
  {
    let next = match self
    {
      Readiness::AwaitingBoth => Readiness::AwaitingSurface,
      Readiness::AwaitingModel => Readiness::Ready,
      other => other,
    };

    Transition::between(self, next)
  }

  /// Surface lost: the model survives, GPU state must be rebuilt.
  pub fn surface_unrealized(self) -> Transition
  {
    let next = match self
    {
      Readiness::Ready => Readiness::AwaitingSurface,
      Readiness::AwaitingModel => Readiness::AwaitingBoth,
      other => other,
    };

    Transition::between(self, next)
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn surface_then_model_enters_ready_once()
  {
    let t1 = Readiness::default().surface_realized();
    assert_eq!(t1.state, Readiness::AwaitingModel);
    assert!(!t1.entered_ready);

    let t2 = t1.state.model_loaded();
    assert_eq!(t2.state, Readiness::Ready);
    assert!(t2.entered_ready);
  }

  #[test]
  fn model_then_surface_enters_ready_once()
  {
    let t1 = Readiness::default().model_loaded();
    assert_eq!(t1.state, Readiness::AwaitingSurface);
    assert!(!t1.entered_ready);

    let t2 = t1.state.surface_realized();
    assert_eq!(t2.state, Readiness::Ready);
    assert!(t2.entered_ready);
  }

  #[test]
  fn repeated_events_do_not_reenter_ready()
  {
    let ready = Readiness::Ready;

    assert!(!ready.surface_realized().entered_ready);
    assert!(!ready.model_loaded().entered_ready);
    assert_eq!(ready.model_loaded().state, Readiness::Ready);
  }

  #[test]
  fn duplicate_surface_event_while_waiting_is_ignored()
  {
    let waiting = Readiness::AwaitingModel;
    let t = waiting.surface_realized();

    assert_eq!(t.state, Readiness::AwaitingModel);
    assert!(!t.entered_ready);
  }

  #[test]
  fn unrealize_and_realize_reenters_ready()
  {
    let lost = Readiness::Ready.surface_unrealized();
    assert_eq!(lost.state, Readiness::AwaitingSurface);
    assert!(lost.state.has_model());

    let back = lost.state.surface_realized();
    assert!(back.entered_ready);
  }

  #[test]
  fn unrealize_before_model_waits_for_both()
  {
    assert_eq!(Readiness::AwaitingModel.surface_unrealized().state, Readiness::AwaitingBoth);
    assert_eq!(Readiness::AwaitingBoth.surface_unrealized().state, Readiness::AwaitingBoth);
  }
}
