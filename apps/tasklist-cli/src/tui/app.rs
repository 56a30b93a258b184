use tasklist_core::controller::{TaskListController, TaskRequest};
use tasklist_core::session::{EntryForm, Route};
use tasklist_core::types::{Credentials, Task, TaskId};

use super::composer::Composer;

/// Remote work requested by `update`, run by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Resolve the identity through the session gate
    Mount,
    SignIn(Credentials),
    SignUp(Credentials),
    SignOut,
    Task(TaskRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    NewTask,
    Edit,
}

/// A task picked up for keyboard reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grab {
    pub task_id: TaskId,
    /// Index the task started from, restored on cancel
    pub origin: usize,
}

pub struct App {
    pub dirty: bool,
    pub width: u16,
    pub height: u16,
    pub should_quit: bool,
    /// `None` until the session gate answers
    pub route: Option<Route>,
    pub entry: EntryForm,
    pub entry_field: EntryField,
    pub email: Composer,
    pub password: Composer,
    pub controller: TaskListController,
    pub focus: Focus,
    pub selected: usize,
    pub grab: Option<Grab>,
    pub new_task: Composer,
    pub edit: Composer,
    pub in_flight: usize,
    pending: Vec<Effect>,
}

impl App {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            dirty: true,
            width,
            height,
            should_quit: false,
            route: None,
            entry: EntryForm::new(),
            entry_field: EntryField::Email,
            email: Composer::new(),
            password: Composer::new(),
            controller: TaskListController::new(),
            focus: Focus::List,
            selected: 0,
            grab: None,
            new_task: Composer::new(),
            edit: Composer::new(),
            in_flight: 1,
            pending: vec![Effect::Mount],
        }
    }

    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn queue(&mut self, effect: Effect) {
        self.in_flight += 1;
        self.pending.push(effect);
    }

    /// Queue a task request if the controller produced one.
    pub fn queue_request(&mut self, request: Option<TaskRequest>) -> bool {
        match request {
            Some(request) => {
                self.queue(Effect::Task(request));
                true
            }
            None => false,
        }
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.pending)
    }

    /// A remote call answered.
    pub fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.controller.tasks().get(self.selected)
    }

    pub fn clamp_selection(&mut self) {
        let len = self.controller.tasks().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Leave the task view: drop grab, inputs and edit focus.
    pub fn reset_task_view(&mut self) {
        self.focus = Focus::List;
        self.selected = 0;
        self.grab = None;
        self.new_task.clear();
        self.edit.clear();
    }
}
