use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::facelet::{Color, CubeState, Face, ALL_COLORS, ALL_FACES, CENTER};
use crate::validator::{self, ValidationResult};

/// Order in which [GuidedFlow] walks the faces.
pub const GUIDED_ORDER: [Face; 6] = [
    Face::Front,
    Face::Right,
    Face::Back,
    Face::Left,
    Face::Up,
    Face::Down,
];

fn face_complete(state: &CubeState, face: Face) -> bool {
    state.faces[face].iter().all(Option::is_some)
}

/// Where the user is in the face-by-face configuration flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationProgress {
    pub current_face: Face,
    pub current_step: usize,
    pub total_steps: usize,
    pub completed_faces: Vec<Face>,
    pub percent_complete: u8,
}

impl ConfigurationProgress {
    fn start(state: &CubeState) -> Self {
        let mut progress = Self {
            current_face: Face::Front,
            current_step: 0,
            total_steps: GUIDED_ORDER.len(),
            completed_faces: Vec::new(),
            percent_complete: 0,
        };
        progress.refresh(state);
        progress
    }

    fn refresh(&mut self, state: &CubeState) {
        let configured = state.configured_count();
        self.percent_complete = ((configured * 100 + 27) / 54) as u8;
        self.completed_faces = GUIDED_ORDER
            .into_iter()
            .filter(|&face| face_complete(state, face))
            .collect();
    }
}

type Observer = Box<dyn Fn(&CubeState, &ConfigurationProgress) + Send + Sync>;

/// Handle returned by [ConfigurationManager::subscribe].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

/// Holds the cube being configured and tells observers about every change.
///
/// Observers run synchronously after each successful mutation. A panicking observer is
/// logged and skipped, the others still run.
pub struct ConfigurationManager {
    state: CubeState,
    progress: ConfigurationProgress,
    observers: BTreeMap<ObserverId, Observer>,
    next_id: u64,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    pub fn new() -> Self {
        Self::with_state(CubeState::empty())
    }

    pub fn with_state(state: CubeState) -> Self {
        let state = CubeState::from_faces(state.faces);
        Self {
            progress: ConfigurationProgress::start(&state),
            state,
            observers: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: Fn(&CubeState, &ConfigurationProgress) + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.insert(id, Box::new(observer));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.remove(&id).is_some()
    }

    pub fn unsubscribe_all(&mut self) {
        self.observers.clear();
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&self) {
        for (id, observer) in &self.observers {
            let result = catch_unwind(AssertUnwindSafe(|| observer(&self.state, &self.progress)));
            if result.is_err() {
                log::error!("state observer {:?} panicked", id);
            }
        }
    }

    fn touch(&mut self) {
        self.state = CubeState::from_faces(self.state.faces);
        self.progress.refresh(&self.state);
    }

    pub fn state(&self) -> &CubeState {
        &self.state
    }

    pub fn progress(&self) -> &ConfigurationProgress {
        &self.progress
    }

    pub fn can_modify_facelet(&self, position: usize) -> bool {
        position < 9 && position != CENTER
    }

    pub fn facelet_color(&self, face: Face, position: usize) -> Option<Color> {
        self.state.color(face, position)
    }

    pub fn set_facelet_color(
        &mut self,
        face: Face,
        position: usize,
        color: Option<Color>,
    ) -> Result<(), Error> {
        self.state = self.state.with_color(face, position, color)?;
        self.progress.refresh(&self.state);
        self.notify();
        Ok(())
    }

    /// Number of stickers per color.
    pub fn color_counts(&self) -> Vec<(Color, usize)> {
        let counts = self.state.color_counts();
        ALL_COLORS
            .into_iter()
            .map(|color| (color, counts[color as usize]))
            .collect()
    }

    /// Run the validator and record the outcome in the state metadata.
    pub fn validate(&mut self) -> ValidationResult {
        let result = validator::validate(&self.state);
        self.set_validation_status(result.is_valid);
        result
    }

    pub fn set_validation_status(&mut self, is_valid: bool) {
        self.state.metadata.is_valid = is_valid;
        self.state.metadata.last_modified = SystemTime::now();
        self.notify();
    }

    pub fn set_current_face(&mut self, face: Face, step: usize) {
        self.progress.current_face = face;
        self.progress.current_step = step.min(self.progress.total_steps);
        self.notify();
    }

    /// Back to an empty cube, centers stay.
    pub fn reset(&mut self) {
        self.state = CubeState::empty();
        self.progress = ConfigurationProgress::start(&self.state);
        self.notify();
    }

    /// Replace the whole cube. Centers are forced to their face color.
    pub fn set_state(&mut self, state: CubeState) {
        let mut faces = state.faces;
        for face in ALL_FACES {
            faces[face][CENTER] = Some(face.center_color());
        }
        self.state.faces = faces;
        self.touch();
        self.notify();
    }
}

/// Step-by-step configuration: one face at a time in [GUIDED_ORDER], moving on only once
/// the current face has all nine stickers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuidedFlow {
    index: usize,
}

impl GuidedFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_face(&self) -> Face {
        GUIDED_ORDER[self.index]
    }

    /// 0 for the first face, 5 for the last.
    pub fn current_step(&self) -> usize {
        self.index
    }

    pub fn total_steps(&self) -> usize {
        GUIDED_ORDER.len()
    }

    pub fn instructions(&self) -> &'static str {
        match self.current_face() {
            Face::Front => "Configure the front face (green center). Look at the face facing you.",
            Face::Right => {
                "Configure the right face (red center). Rotate the cube or look at the right side."
            }
            Face::Back => "Configure the back face (blue center). Look at the face opposite to you.",
            Face::Left => {
                "Configure the left face (orange center). Rotate the cube or look at the left side."
            }
            Face::Up => "Configure the top face (white center). Look at the face on top of the cube.",
            Face::Down => {
                "Configure the bottom face (yellow center). Look at the face at the bottom of the cube."
            }
        }
    }

    pub fn is_current_face_complete(&self, manager: &ConfigurationManager) -> bool {
        face_complete(manager.state(), self.current_face())
    }

    /// Returns false, and stays put, while the current face has blanks or on the last face.
    pub fn next_face(&mut self, manager: &mut ConfigurationManager) -> bool {
        if !self.is_current_face_complete(manager) || self.index + 1 >= GUIDED_ORDER.len() {
            return false;
        }
        self.index += 1;
        self.sync(manager);
        true
    }

    pub fn previous_face(&mut self, manager: &mut ConfigurationManager) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.sync(manager);
        true
    }

    /// Jumping is allowed to any face, complete or not.
    pub fn jump_to_face(&mut self, face: Face, manager: &mut ConfigurationManager) {
        self.index = GUIDED_ORDER
            .iter()
            .position(|&f| f == face)
            .unwrap_or_default();
        self.sync(manager);
    }

    pub fn completed_faces(&self, manager: &ConfigurationManager) -> Vec<Face> {
        manager.progress().completed_faces.clone()
    }

    pub fn remaining_faces(&self, manager: &ConfigurationManager) -> Vec<Face> {
        GUIDED_ORDER
            .into_iter()
            .filter(|&face| !face_complete(manager.state(), face))
            .collect()
    }

    pub fn is_complete(&self, manager: &ConfigurationManager) -> bool {
        manager.state().is_complete()
    }

    pub fn reset(&mut self, manager: &mut ConfigurationManager) {
        self.index = 0;
        self.sync(manager);
    }

    fn sync(&self, manager: &mut ConfigurationManager) {
        log::debug!(
            "configuring {} ({}/{})",
            self.current_face(),
            self.index + 1,
            GUIDED_ORDER.len()
        );
        manager.set_current_face(self.current_face(), self.index);
    }
}
