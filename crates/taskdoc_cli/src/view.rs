//! Console rendering of menus and tasks.

use std::io::{self, Write};
use taskdoc_core::Task;

pub(crate) fn write_main_menu<W: Write>(output: &mut W, task_count: usize) -> io::Result<()> {
    writeln!(output)?;
    writeln!(output, "=== Task Manager ===")?;
    writeln!(output, "1. Add task")?;
    if task_count == 0 {
        writeln!(output, "2. View tasks (no tasks yet)")?;
    } else {
        writeln!(output, "2. View tasks ({task_count})")?;
    }
    writeln!(output, "3. Exit")
}

pub(crate) fn write_titles<W: Write>(output: &mut W, tasks: &[Task]) -> io::Result<()> {
    for (position, task) in tasks.iter().enumerate() {
        let marker = if task.completed { "x" } else { " " };
        writeln!(output, "{}. [{marker}] {}", position + 1, task.title)?;
    }
    Ok(())
}

pub(crate) fn write_task<W: Write>(output: &mut W, task: &Task) -> io::Result<()> {
    writeln!(output)?;
    writeln!(output, "---- Selected task ----")?;
    writeln!(output, "Title:       {}", task.title)?;
    writeln!(output, "Description: {}", task.description)?;
    writeln!(output, "Created:     {}", task.display_created_at())?;
    writeln!(
        output,
        "Completed:   {}",
        if task.completed { "Yes" } else { "No" }
    )?;
    writeln!(output, "ID:          {}", task.id())?;
    writeln!(output, "-----------------------")
}

pub(crate) fn write_edit_options<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "1. Edit title")?;
    writeln!(output, "2. Edit description")?;
    writeln!(output, "3. Toggle status")?;
    writeln!(output, "4. Delete task")?;
    writeln!(output, "5. Return")
}
