//! Drawing State Store
//!
//! The authoritative stroke history of one room.
//!
//! - `strokes` is an arena keyed by [`StrokeId`]; nothing outside this module
//!   holds a mutable reference into it.
//! - `history` is the chronological, global undo stack. A stroke is visible
//!   exactly while its id is in `history`.
//! - `redo_stack` holds undone ids (LIFO). It is disjoint from `history` and
//!   is cleared whenever a new stroke begins.
//!
//! Undo/redo is global: any participant undoes the room's most recent stroke,
//! whoever drew it. Redo re-appends at the end of `history`, so a redone
//! stroke is ranked after strokes drawn in the meantime.

use std::collections::HashMap;

use super::{
    entity::{Point, Stroke},
    error::DrawingError,
    value_object::{StrokeId, UserId},
};

#[derive(Debug, Clone, Default)]
pub struct DrawingState {
    strokes: HashMap<StrokeId, Stroke>,
    history: Vec<StrokeId>,
    redo_stack: Vec<StrokeId>,
}

impl DrawingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new stroke at the top of the history and drop the redo stack.
    pub fn begin_stroke(&mut self, stroke: Stroke) -> Result<(), DrawingError> {
        if self.strokes.contains_key(&stroke.id) {
            return Err(DrawingError::DuplicateStroke(
                stroke.id.as_str().to_string(),
            ));
        }
        self.history.push(stroke.id.clone());
        self.strokes.insert(stroke.id.clone(), stroke);
        self.redo_stack.clear();
        Ok(())
    }

    /// Append a point to an unfinalized stroke owned by `owner_id`.
    pub fn append_point(
        &mut self,
        stroke_id: &StrokeId,
        owner_id: &UserId,
        point: Point,
    ) -> Result<(), DrawingError> {
        let stroke = self.owned_open_stroke(stroke_id, owner_id)?;
        stroke.push_point(point);
        Ok(())
    }

    /// Mark a stroke owned by `owner_id` as complete.
    pub fn finalize(&mut self, stroke_id: &StrokeId, owner_id: &UserId) -> Result<(), DrawingError> {
        let stroke = self.owned_open_stroke(stroke_id, owner_id)?;
        stroke.mark_finalized();
        Ok(())
    }

    /// Pop the most recent stroke off the history onto the redo stack.
    ///
    /// The stroke stays in the arena so a later redo can restore it.
    pub fn undo(&mut self) -> Result<Stroke, DrawingError> {
        let stroke_id = self.history.pop().ok_or(DrawingError::NothingToUndo)?;
        let stroke = self
            .strokes
            .get(&stroke_id)
            .cloned()
            .ok_or_else(|| DrawingError::StrokeNotFound(stroke_id.as_str().to_string()))?;
        self.redo_stack.push(stroke_id);
        Ok(stroke)
    }

    /// Pop the most recently undone stroke and append it to the end of the history.
    pub fn redo(&mut self) -> Result<Stroke, DrawingError> {
        let stroke_id = self.redo_stack.pop().ok_or(DrawingError::NothingToRedo)?;
        let stroke = self
            .strokes
            .get(&stroke_id)
            .cloned()
            .ok_or_else(|| DrawingError::StrokeNotFound(stroke_id.as_str().to_string()))?;
        self.history.push(stroke_id);
        Ok(stroke)
    }

    /// Drop every stroke. Not undoable.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.history.clear();
        self.redo_stack.clear();
    }

    /// Finalized strokes currently on the canvas, in history order.
    ///
    /// Used to bootstrap a newly joined participant; strokes still being drawn
    /// (or abandoned mid-draw) are left out.
    pub fn snapshot(&self) -> Vec<Stroke> {
        self.visible()
            .filter(|stroke| stroke.is_finalized())
            .cloned()
            .collect()
    }

    /// Every stroke currently on the canvas, finalized or not, in history order.
    pub fn visible(&self) -> impl Iterator<Item = &Stroke> {
        self.history.iter().filter_map(|id| self.strokes.get(id))
    }

    pub fn stroke(&self, stroke_id: &StrokeId) -> Option<&Stroke> {
        self.strokes.get(stroke_id)
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    fn owned_open_stroke(
        &mut self,
        stroke_id: &StrokeId,
        owner_id: &UserId,
    ) -> Result<&mut Stroke, DrawingError> {
        let stroke = self
            .strokes
            .get_mut(stroke_id)
            .ok_or_else(|| DrawingError::StrokeNotFound(stroke_id.as_str().to_string()))?;
        if !stroke.is_owned_by(owner_id) {
            return Err(DrawingError::OwnershipDenied {
                stroke_id: stroke_id.as_str().to_string(),
                requested_by: owner_id.as_str().to_string(),
            });
        }
        if stroke.is_finalized() {
            return Err(DrawingError::AlreadyFinalized(
                stroke_id.as_str().to_string(),
            ));
        }
        Ok(stroke)
    }
}
