use strum_macros::{EnumCount, EnumIter};

/// The four cardinal directions an organism can be facing or moving in.
///
/// `left` and `right` are each involutions (`left(left(d)) == d`), but they
/// pair the axes differently from one another: `left` swaps `PosX<->PosY`
/// and `NegX<->NegY`, `right` swaps `PosX<->NegY` and `NegX<->PosY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardinalDirection {
    PosX,
    NegX,
    PosY,
    NegY,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::PosX,
        CardinalDirection::NegX,
        CardinalDirection::PosY,
        CardinalDirection::NegY,
    ];

    pub fn unit(&self) -> crate::coord::Delta {
        use crate::coord::Delta;
        match self {
            CardinalDirection::PosX => Delta { dx: 1, dy: 0 },
            CardinalDirection::NegX => Delta { dx: -1, dy: 0 },
            CardinalDirection::PosY => Delta { dx: 0, dy: 1 },
            CardinalDirection::NegY => Delta { dx: 0, dy: -1 },
        }
    }

    pub fn left(&self) -> CardinalDirection {
        match self {
            CardinalDirection::PosX => CardinalDirection::PosY,
            CardinalDirection::PosY => CardinalDirection::PosX,
            CardinalDirection::NegX => CardinalDirection::NegY,
            CardinalDirection::NegY => CardinalDirection::NegX,
        }
    }

    pub fn right(&self) -> CardinalDirection {
        match self {
            CardinalDirection::PosX => CardinalDirection::NegY,
            CardinalDirection::NegY => CardinalDirection::PosX,
            CardinalDirection::NegX => CardinalDirection::PosY,
            CardinalDirection::PosY => CardinalDirection::NegX,
        }
    }
}

/// The 16 environmental sensors an organism's brain can read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum SenseKind {
    XLoc,
    YLoc,
    DistanceFromNearestEdge,
    DistanceFromNearestXEdge,
    DistanceFromNearestYEdge,
    DistanceFromForwardEdge,
    DistanceFromLrEdge,
    DistanceFromForwardBoundary,
    DistanceFromLrBoundary,
    DistanceFromNearestXBoundary,
    DistanceFromNearestYBoundary,
    PopulationClose,
    PopulationForward,
    DistanceFromForwardOrganism,
    DistanceFromLrOrganism,
    Age,
}

/// The 8 movement actions an organism's brain can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum ActionKind {
    MovePosX,
    MoveNegX,
    MovePosY,
    MoveNegY,
    MoveForward,
    MoveLeft,
    MoveRight,
    MoveRandom,
}

/// A node's identity: which catalog it draws from, and which member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Sense(SenseKind),
    Inner(u32),
    Action(ActionKind),
}

impl NodeKind {
    /// 0/1/2 tag distinguishing Sense/Inner/Action without comparing payload.
    pub fn kind_tag(&self) -> u8 {
        match self {
            NodeKind::Sense(_) => 0,
            NodeKind::Inner(_) => 1,
            NodeKind::Action(_) => 2,
        }
    }

    /// A numeric id comparable within a kind (catalog ordinal, or inner index).
    pub fn numeric_id(&self) -> i64 {
        match self {
            NodeKind::Sense(s) => *s as i64,
            NodeKind::Inner(i) => *i as i64,
            NodeKind::Action(a) => *a as i64,
        }
    }

    pub fn is_sense(&self) -> bool {
        matches!(self, NodeKind::Sense(_))
    }

    pub fn is_action(&self) -> bool {
        matches!(self, NodeKind::Action(_))
    }

    pub fn is_inner(&self) -> bool {
        matches!(self, NodeKind::Inner(_))
    }
}

/// A node in the brain graph: its catalog identity plus the scratch value
/// set/read during a single evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub value: f32,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node { kind, value: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_right_are_involutions() {
        for d in CardinalDirection::ALL {
            assert_eq!(d.left().left(), d);
            assert_eq!(d.right().right(), d);
        }
    }

    #[test]
    fn left_and_right_pair_the_axes_differently() {
        // left swaps PosX<->PosY and NegX<->NegY...
        assert_eq!(CardinalDirection::PosX.left(), CardinalDirection::PosY);
        assert_eq!(CardinalDirection::PosY.left(), CardinalDirection::PosX);
        // ...while right swaps PosX<->NegY and NegX<->PosY instead.
        assert_eq!(CardinalDirection::PosX.right(), CardinalDirection::NegY);
        assert_eq!(CardinalDirection::NegY.right(), CardinalDirection::PosX);
        for d in CardinalDirection::ALL {
            assert_ne!(d.left(), d.right());
        }
    }

    #[test]
    fn node_kind_numeric_id_matches_catalog_ordinal() {
        assert_eq!(NodeKind::Sense(SenseKind::XLoc).numeric_id(), 0);
        assert_eq!(NodeKind::Sense(SenseKind::Age).numeric_id(), 15);
        assert_eq!(NodeKind::Action(ActionKind::MovePosX).numeric_id(), 0);
        assert_eq!(NodeKind::Inner(3).numeric_id(), 3);
    }
}
