//! In-memory task list with pomodoro tracking.
//!
//! The timer engine only sees this through [`PomodoroCredit`]; everything
//! else here is ordinary list bookkeeping for the front end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result, ValidationError};
use crate::timer::PomodoroCredit;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
    /// Estimated pomodoros.
    pub pomodoros: u32,
    pub completed_pomodoros: u32,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fields accepted when creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub pomodoros: u32,
    pub priority: Priority,
}

/// Partial update; `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub pomodoros: Option<u32>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl std::str::FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "completed" => Ok(TaskFilter::Completed),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStore {
    tasks: Vec<Task>,
    #[serde(default)]
    current_task: Option<String>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn current(&self) -> Option<&Task> {
        self.current_task.as_deref().and_then(|id| self.get(id))
    }

    pub fn add(&mut self, new: NewTask) -> Result<&Task> {
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::Empty("title".into()).into());
        }
        self.tasks.push(Task {
            id: Uuid::new_v4().to_string(),
            title,
            description: new.description,
            completed: false,
            pomodoros: new.pomodoros.max(1),
            completed_pomodoros: 0,
            priority: new.priority,
            created_at: Utc::now(),
            completed_at: None,
        });
        let task = &self.tasks[self.tasks.len() - 1];
        tracing::debug!(task_id = %task.id, "task added");
        Ok(task)
    }

    pub fn update(&mut self, id: &str, update: TaskUpdate) -> Result<&Task> {
        let task = self.get_mut(id)?;
        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = Some(description);
        }
        if let Some(pomodoros) = update.pomodoros {
            task.pomodoros = pomodoros.max(1);
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
            task.completed_at = completed.then(Utc::now);
        }
        Ok(task)
    }

    /// Remove a task. Clears the current-task designation if it pointed here.
    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        if self.current_task.as_deref() == Some(id) {
            self.current_task = None;
        }
        Ok(self.tasks.remove(pos))
    }

    /// Designate (or clear) the task that receives pomodoro credit.
    pub fn set_current(&mut self, id: Option<&str>) -> Result<()> {
        if let Some(id) = id {
            self.get_mut(id)?;
        }
        self.current_task = id.map(str::to_string);
        Ok(())
    }

    /// Credit one pomodoro. Does nothing once the estimate is reached;
    /// reaching it marks the task completed.
    pub fn complete_one_pomodoro(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if task.completed_pomodoros >= task.pomodoros {
            return false;
        }
        task.completed_pomodoros += 1;
        if task.completed_pomodoros >= task.pomodoros {
            task.completed = true;
            task.completed_at = Some(Utc::now());
            tracing::info!(task_id = %task.id, "task finished");
        }
        true
    }

    /// Drop every completed task; returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        if self
            .current_task
            .as_deref()
            .is_some_and(|id| !self.tasks.iter().any(|t| t.id == id))
        {
            self.current_task = None;
        }
        before - self.tasks.len()
    }

    /// Tasks matching `filter` whose title contains `query` (case-insensitive).
    pub fn filtered(&self, filter: TaskFilter, query: &str) -> Vec<&Task> {
        let query = query.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| match filter {
                TaskFilter::All => true,
                TaskFilter::Active => !t.completed,
                TaskFilter::Completed => t.completed,
            })
            .filter(|t| query.is_empty() || t.title.to_lowercase().contains(&query))
            .collect()
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))
    }
}

impl PomodoroCredit for TaskStore {
    fn current_task_id(&self) -> Option<String> {
        self.current_task.clone()
    }

    fn complete_one_pomodoro(&mut self, task_id: &str) {
        TaskStore::complete_one_pomodoro(self, task_id);
    }
}
