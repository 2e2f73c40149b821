//! Sequential navigation over the catalog or an active tag restriction
//!
//! Two modes, chosen by whether a restriction is set:
//! - unrestricted: step by file id, skipping ids with no record
//! - restricted: step by position within the restriction
//!
//! Stepping past either end leaves the position unchanged.

use app_db::FileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Outcome of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    MoveTo(FileId),
    Stay,
}

impl Step {
    pub fn target(self) -> Option<FileId> {
        match self {
            Step::MoveTo(id) => Some(id),
            Step::Stay => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode<'a> {
    Unrestricted,
    Restricted(&'a [FileId]),
}

impl<'a> NavigationMode<'a> {
    pub fn from_restriction(restriction: &'a [FileId]) -> Self {
        if restriction.is_empty() {
            NavigationMode::Unrestricted
        } else {
            NavigationMode::Restricted(restriction)
        }
    }
}

/// Scan ids one at a time from `current` towards `highest` (or 1), returning
/// the first id for which `exists` holds.
pub fn step_unrestricted<E, F>(
    current: Option<FileId>,
    direction: Direction,
    highest: Option<FileId>,
    mut exists: F,
) -> Result<Step, E>
where
    F: FnMut(FileId) -> Result<bool, E>,
{
    let Some(current) = current else {
        return Ok(Step::Stay);
    };

    match direction {
        Direction::Next => {
            let Some(highest) = highest else {
                return Ok(Step::Stay);
            };
            let mut id = current.saturating_add(1);
            while id <= highest {
                if exists(id)? {
                    return Ok(Step::MoveTo(id));
                }
                id += 1;
            }
        }
        Direction::Prev => {
            let mut id = current.saturating_sub(1);
            while id >= 1 {
                if exists(id)? {
                    return Ok(Step::MoveTo(id));
                }
                id -= 1;
            }
        }
    }

    Ok(Step::Stay)
}

/// Step one position within `restriction`.
///
/// If `current` is not part of the restriction, jump to its first element.
pub fn step_restricted(current: Option<FileId>, direction: Direction, restriction: &[FileId]) -> Step {
    let Some(&first) = restriction.first() else {
        return Step::Stay;
    };

    let position = current.and_then(|c| restriction.iter().position(|&id| id == c));
    let Some(index) = position else {
        return Step::MoveTo(first);
    };

    let target = match direction {
        Direction::Next => restriction.get(index + 1),
        Direction::Prev => index.checked_sub(1).and_then(|i| restriction.get(i)),
    };

    target.map_or(Step::Stay, |&id| Step::MoveTo(id))
}

/// Navigation position owned by the session
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    current: Option<FileId>,
    restriction: Vec<FileId>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<FileId> {
        self.current
    }

    pub fn set_current(&mut self, id: FileId) {
        self.current = Some(id);
    }

    pub fn restriction(&self) -> &[FileId] {
        &self.restriction
    }

    pub fn mode(&self) -> NavigationMode<'_> {
        NavigationMode::from_restriction(&self.restriction)
    }

    pub fn set_restriction(&mut self, ids: Vec<FileId>) {
        self.restriction = ids;
    }

    pub fn clear_restriction(&mut self) {
        self.restriction.clear();
    }

    /// Compute the next position without moving
    pub fn plan<E, F>(&self, direction: Direction, highest: Option<FileId>, exists: F) -> Result<Step, E>
    where
        F: FnMut(FileId) -> Result<bool, E>,
    {
        match self.mode() {
            NavigationMode::Unrestricted => step_unrestricted(self.current, direction, highest, exists),
            NavigationMode::Restricted(ids) => Ok(step_restricted(self.current, direction, ids)),
        }
    }

    /// Forget the position and restriction
    pub fn reset(&mut self) {
        self.current = None;
        self.restriction.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn sparse(ids: &'static [FileId]) -> impl FnMut(FileId) -> Result<bool, Infallible> {
        move |id| Ok(ids.contains(&id))
    }

    fn unrestricted(current: FileId, direction: Direction) -> Step {
        step_unrestricted(Some(current), direction, Some(4), sparse(&[1, 3, 4])).unwrap()
    }

    #[test]
    fn test_unrestricted_skips_gaps() {
        assert_eq!(unrestricted(1, Direction::Next), Step::MoveTo(3));
        assert_eq!(unrestricted(4, Direction::Prev), Step::MoveTo(3));
        assert_eq!(unrestricted(3, Direction::Prev), Step::MoveTo(1));
    }

    #[test]
    fn test_unrestricted_bounds() {
        assert_eq!(unrestricted(4, Direction::Next), Step::Stay);
        assert_eq!(unrestricted(1, Direction::Prev), Step::Stay);
    }

    #[test]
    fn test_unrestricted_without_position() {
        let step = step_unrestricted(None, Direction::Next, Some(4), sparse(&[1, 3, 4])).unwrap();
        assert_eq!(step, Step::Stay);

        let step = step_unrestricted(Some(1), Direction::Next, None, sparse(&[])).unwrap();
        assert_eq!(step, Step::Stay);
    }

    #[test]
    fn test_unrestricted_lookup_error_propagates() {
        let result = step_unrestricted(Some(1), Direction::Next, Some(3), |_| Err("store gone"));
        assert_eq!(result, Err("store gone"));
    }

    #[test]
    fn test_restricted_steps_by_position() {
        let restriction = [5, 2, 9];
        assert_eq!(step_restricted(Some(2), Direction::Next, &restriction), Step::MoveTo(9));
        assert_eq!(step_restricted(Some(2), Direction::Prev, &restriction), Step::MoveTo(5));
    }

    #[test]
    fn test_restricted_bounds_do_not_wrap() {
        let restriction = [5, 2, 9];
        assert_eq!(step_restricted(Some(9), Direction::Next, &restriction), Step::Stay);
        assert_eq!(step_restricted(Some(5), Direction::Prev, &restriction), Step::Stay);
    }

    #[test]
    fn test_restricted_fallback_to_first() {
        let restriction = [5, 2, 9];
        assert_eq!(step_restricted(Some(7), Direction::Next, &restriction), Step::MoveTo(5));
        assert_eq!(step_restricted(Some(7), Direction::Prev, &restriction), Step::MoveTo(5));
        assert_eq!(step_restricted(None, Direction::Next, &restriction), Step::MoveTo(5));
    }

    #[test]
    fn test_state_switches_mode() {
        let mut state = NavigationState::new();
        assert_eq!(state.mode(), NavigationMode::Unrestricted);

        state.set_current(7);
        state.set_restriction(vec![5, 2, 9]);
        assert_eq!(state.mode(), NavigationMode::Restricted(&[5, 2, 9]));
        assert_eq!(
            state.plan(Direction::Next, Some(9), sparse(&[2, 5, 7, 9])).unwrap(),
            Step::MoveTo(5)
        );

        state.clear_restriction();
        assert_eq!(
            state.plan(Direction::Next, Some(9), sparse(&[2, 5, 7, 9])).unwrap(),
            Step::MoveTo(9)
        );
    }

    #[test]
    fn test_reset() {
        let mut state = NavigationState::new();
        state.set_current(3);
        state.set_restriction(vec![3]);
        state.reset();
        assert_eq!(state.current(), None);
        assert!(state.restriction().is_empty());
    }
}
