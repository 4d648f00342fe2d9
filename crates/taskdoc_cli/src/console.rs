//! Interactive menu loop over a `TaskStore`.
//!
//! # Responsibility
//! - Translate menu choices into store operations.
//! - Validate console input before it reaches the store.
//!
//! # Invariants
//! - `NotFound` is reported and the loop continues.
//! - Corrupt-document and I/O failures end the loop with an error.
//! - End of input ends the loop without error.

use crate::input::{read_choice, read_required_text};
use crate::view;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use taskdoc_core::{DocumentStorage, ErrorKind, FileDocument, StoreError, Task, TaskStore};

const OPTION_PROMPT: &str = "Choose an option: ";
const TASK_PROMPT: &str = "Choose the task: ";

pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Failure that ends the menu loop.
#[derive(Debug)]
pub enum ConsoleError {
    Io(io::Error),
    Store(StoreError),
}

impl Display for ConsoleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "console I/O failed: {err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConsoleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<io::Error> for ConsoleError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<StoreError> for ConsoleError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainAction {
    AddTask,
    ViewTasks,
    Exit,
}

impl MainAction {
    const COUNT: usize = 3;

    fn from_number(value: usize) -> Option<Self> {
        match value {
            1 => Some(Self::AddTask),
            2 => Some(Self::ViewTasks),
            3 => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditAction {
    EditTitle,
    EditDescription,
    ToggleStatus,
    Delete,
    Return,
}

impl EditAction {
    const COUNT: usize = 5;

    fn from_number(value: usize) -> Option<Self> {
        match value {
            1 => Some(Self::EditTitle),
            2 => Some(Self::EditDescription),
            3 => Some(Self::ToggleStatus),
            4 => Some(Self::Delete),
            5 => Some(Self::Return),
            _ => None,
        }
    }
}

/// Whether the loop keeps running after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Menu loop bound to one store and one pair of console streams.
pub struct Console<'s, R, W, S: DocumentStorage = FileDocument> {
    input: R,
    output: W,
    store: &'s TaskStore<S>,
}

impl<'s, R: BufRead, W: Write, S: DocumentStorage> Console<'s, R, W, S> {
    pub fn new(input: R, output: W, store: &'s TaskStore<S>) -> Self {
        Self {
            input,
            output,
            store,
        }
    }

    /// Runs until the user exits or input ends.
    pub fn run(&mut self) -> ConsoleResult<()> {
        loop {
            view::write_main_menu(&mut self.output, self.store.len())?;
            let Some(choice) = read_choice(
                &mut self.input,
                &mut self.output,
                OPTION_PROMPT,
                1,
                MainAction::COUNT,
            )?
            else {
                return Ok(());
            };

            let flow = match MainAction::from_number(choice) {
                Some(MainAction::AddTask) => self.add_task()?,
                Some(MainAction::ViewTasks) => self.view_tasks()?,
                Some(MainAction::Exit) | None => Flow::Quit,
            };
            if flow == Flow::Quit {
                return Ok(());
            }
        }
    }

    fn add_task(&mut self) -> ConsoleResult<Flow> {
        let Some(title) = self.read_text("Enter task title: ", "Task title")? else {
            return Ok(Flow::Quit);
        };
        let Some(description) = self.read_text("Enter task description: ", "Task description")?
        else {
            return Ok(Flow::Quit);
        };

        let task = self.store.add(title, description)?;
        writeln!(self.output, "Task added successfully!")?;
        view::write_task(&mut self.output, &task)?;
        Ok(Flow::Continue)
    }

    fn view_tasks(&mut self) -> ConsoleResult<Flow> {
        let tasks = self.store.list_all();
        if tasks.is_empty() {
            writeln!(self.output, "No tasks!")?;
            return Ok(Flow::Continue);
        }

        view::write_titles(&mut self.output, &tasks)?;
        let Some(position) = read_choice(
            &mut self.input,
            &mut self.output,
            TASK_PROMPT,
            1,
            tasks.len(),
        )?
        else {
            return Ok(Flow::Quit);
        };
        let task = &tasks[position - 1];

        view::write_task(&mut self.output, task)?;
        view::write_edit_options(&mut self.output)?;
        let Some(choice) = read_choice(
            &mut self.input,
            &mut self.output,
            OPTION_PROMPT,
            1,
            EditAction::COUNT,
        )?
        else {
            return Ok(Flow::Quit);
        };

        match EditAction::from_number(choice) {
            Some(action) => self.edit_task(task, action),
            None => Ok(Flow::Continue),
        }
    }

    fn edit_task(&mut self, task: &Task, action: EditAction) -> ConsoleResult<Flow> {
        let id = task.id();
        let outcome = match action {
            EditAction::EditTitle => {
                let Some(title) = self.read_text("Enter new title: ", "Title")? else {
                    return Ok(Flow::Quit);
                };
                self.store
                    .update_title(id, title)
                    .map(|()| "Title updated.".to_string())
            }
            EditAction::EditDescription => {
                let Some(description) = self.read_text("Enter new description: ", "Description")?
                else {
                    return Ok(Flow::Quit);
                };
                self.store
                    .update_description(id, description)
                    .map(|()| "Description updated.".to_string())
            }
            EditAction::ToggleStatus => self.store.toggle_completed(id).map(|completed| {
                if completed {
                    "Task marked as completed.".to_string()
                } else {
                    "Task marked as not completed.".to_string()
                }
            }),
            EditAction::Delete => self
                .store
                .delete(id)
                .map(|removed| format!("Task deleted: {}", removed.title)),
            EditAction::Return => return Ok(Flow::Continue),
        };

        match outcome {
            Ok(message) => writeln!(self.output, "{message}")?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                writeln!(self.output, "That task no longer exists.")?
            }
            Err(err) => return Err(err.into()),
        }
        Ok(Flow::Continue)
    }

    fn read_text(&mut self, prompt: &str, field: &str) -> ConsoleResult<Option<String>> {
        Ok(read_required_text(
            &mut self.input,
            &mut self.output,
            prompt,
            field,
        )?)
    }
}
