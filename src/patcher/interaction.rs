//! The drag-to-connect interaction state machine.
//!
//! One gesture is active at a time: `Idle -> Dragging -> Connecting -> Idle`.
//! Pressing an outlet starts a fresh working edge; pressing a connected
//! inlet picks up that inlet's existing edge for re-routing. The machine
//! never mutates the graph itself; releasing produces a `GestureOutcome`
//! the session applies, which keeps every mutation on the one undo-recorded
//! path.

use std::collections::HashMap;

use egui::{Pos2, Rect};

use super::graph::{Edge, Graph, InletRef, OutletRef};
use super::patch::Patch;

/// Address of a slot button on the patcher surface.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotAddr {
    Outlet(OutletRef),
    Inlet(InletRef),
}

/// Screen-space layout of slot buttons, refreshed each frame by the GUI.
///
/// The interaction machine and the edge renderer both resolve slots through
/// this table; it is the only place screen coordinates live.
#[derive(Debug, Default)]
pub struct SlotLayout {
    rects: HashMap<SlotAddr, Rect>,
}

impl SlotLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all recorded rectangles (start of a frame).
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Records the rectangle of a slot button.
    pub fn set_rect(&mut self, slot: SlotAddr, rect: Rect) {
        self.rects.insert(slot, rect);
    }

    /// Returns the recorded rectangle of a slot, if the GUI placed it.
    pub fn rect(&self, slot: &SlotAddr) -> Option<Rect> {
        self.rects.get(slot).copied()
    }

    /// Finds the slot under the given point.
    pub fn hit_test(&self, point: Pos2) -> Option<SlotAddr> {
        self.rects
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(slot, _)| slot.clone())
    }

    /// The point edges attach to: outlets anchor on their right edge,
    /// inlets on their left.
    pub fn anchor(&self, slot: &SlotAddr) -> Option<Pos2> {
        let rect = self.rect(slot)?;
        Some(match slot {
            SlotAddr::Outlet(_) => rect.right_center(),
            SlotAddr::Inlet(_) => rect.left_center(),
        })
    }
}

/// The current phase of the drag gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum DragState {
    /// No gesture in progress.
    Idle,
    /// A working edge follows the pointer; no committed target yet.
    Dragging { source: OutletRef, pointer: Pos2 },
    /// The pointer rests on a compatible inlet.
    Connecting {
        source: OutletRef,
        candidate: InletRef,
        pointer: Pos2,
    },
}

/// What a released gesture asks the session to do.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureOutcome {
    /// No gesture was active.
    None,
    /// The gesture ended without a committed target; nothing changes.
    Discarded,
    /// Create a fresh connection.
    Connect { from: OutletRef, to: InletRef },
    /// Move an existing edge to a new inlet.
    Reroute {
        remove: Edge,
        from: OutletRef,
        to: InletRef,
    },
    /// A picked-up edge was dropped back where it came from.
    Unchanged,
}

/// The drag-to-connect state machine.
#[derive(Debug, Default)]
pub struct Interaction {
    state: DragState,
    /// The edge being re-routed, when the gesture picked one up.
    move_edge: Option<Edge>,
}

impl Default for DragState {
    fn default() -> Self {
        DragState::Idle
    }
}

impl Interaction {
    /// Creates the machine in its idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current drag state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Returns true while a gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// The edge picked up for re-routing, if any.
    pub fn move_edge(&self) -> Option<&Edge> {
        self.move_edge.as_ref()
    }

    /// Press on an outlet button: starts a fresh working edge.
    ///
    /// Ignored while another gesture is active (single-pointer rule).
    pub fn press_outlet(&mut self, source: OutletRef, pointer: Pos2) {
        if self.is_active() {
            return;
        }
        self.state = DragState::Dragging { source, pointer };
    }

    /// Press on an inlet button: picks up that inlet's existing edge.
    ///
    /// The far endpoint (the outlet) becomes the drag source and the inlet
    /// starts out as the committed candidate, so releasing in place leaves
    /// the patch untouched. Pressing an unconnected inlet does nothing.
    pub fn press_inlet(&mut self, inlet: InletRef, pointer: Pos2, graph: &Graph) {
        if self.is_active() {
            return;
        }
        let Some(edge) = graph.edges_to(&inlet).last().cloned() else {
            return;
        };
        self.state = DragState::Connecting {
            source: edge.from.clone(),
            candidate: inlet,
            pointer,
        };
        self.move_edge = Some(edge);
    }

    /// Pointer movement while a gesture may be active.
    ///
    /// Entering a compatible inlet commits it as the candidate; leaving it
    /// reverts to plain dragging. An inlet qualifies when the type rule
    /// passes and the pair is not already connected, except the inlet a
    /// picked-up edge came from, which is always a valid drop-back target.
    pub fn pointer_moved(
        &mut self,
        pointer: Pos2,
        hover: Option<&SlotAddr>,
        graph: &Graph,
        patch: &Patch,
    ) {
        let source = match &self.state {
            DragState::Idle => return,
            DragState::Dragging { source, .. } => source.clone(),
            DragState::Connecting { source, .. } => source.clone(),
        };

        let candidate = match hover {
            Some(SlotAddr::Inlet(inlet)) if self.accepts(inlet, &source, graph, patch) => {
                Some(inlet.clone())
            }
            _ => None,
        };

        self.state = match candidate {
            Some(candidate) => DragState::Connecting {
                source,
                candidate,
                pointer,
            },
            None => DragState::Dragging { source, pointer },
        };
    }

    fn accepts(&self, inlet: &InletRef, source: &OutletRef, graph: &Graph, patch: &Patch) -> bool {
        if let Some(edge) = &self.move_edge {
            if &edge.to == inlet {
                return true;
            }
        }
        graph.can_connect(source, inlet) && !graph.is_connected(patch, source, inlet)
    }

    /// Pointer release: ends the gesture and reports what to do.
    pub fn release(&mut self) -> GestureOutcome {
        let state = std::mem::take(&mut self.state);
        let move_edge = self.move_edge.take();

        match state {
            DragState::Idle => GestureOutcome::None,
            DragState::Dragging { .. } => GestureOutcome::Discarded,
            DragState::Connecting {
                source, candidate, ..
            } => match move_edge {
                Some(edge) if edge.to == candidate => GestureOutcome::Unchanged,
                Some(edge) => GestureOutcome::Reroute {
                    remove: edge,
                    from: source,
                    to: candidate,
                },
                None => GestureOutcome::Connect {
                    from: source,
                    to: candidate,
                },
            },
        }
    }

    /// Explicit cancel (Escape): discards the gesture with no mutation.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = DragState::Idle;
        self.move_edge = None;
        was_active
    }

    /// Endpoints of the working edge for the renderer, while active.
    ///
    /// The edge runs from the source outlet's anchor to the candidate
    /// inlet's anchor, or to the raw pointer when nothing is committed.
    pub fn working_edge(&self, layout: &SlotLayout) -> Option<(Pos2, Pos2)> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { source, pointer } => {
                let start = layout.anchor(&SlotAddr::Outlet(source.clone()))?;
                Some((start, *pointer))
            }
            DragState::Connecting {
                source,
                candidate,
                pointer,
            } => {
                let start = layout.anchor(&SlotAddr::Outlet(source.clone()))?;
                let end = layout
                    .anchor(&SlotAddr::Inlet(candidate.clone()))
                    .unwrap_or(*pointer);
                Some((start, end))
            }
        }
    }
}
