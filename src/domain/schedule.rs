use chrono::NaiveDate;
use serde::Deserialize;

/// Anything with an optional `[start_date, due_date]` window. Both
/// milestones and iterations qualify.
pub trait DateWindowed {
    fn start_date(&self) -> Option<NaiveDate>;
    fn due_date(&self) -> Option<NaiveDate>;

    fn contains(&self, day: NaiveDate) -> bool {
        match (self.start_date(), self.due_date()) {
            (Some(start), Some(due)) => start <= day && day <= due,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl DateWindowed for Milestone {
    fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Iteration {
    pub id: u64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Iteration {
    /// Label shown when picking an iteration by hand; iterations have
    /// no title, so the window is the only human-readable handle.
    pub fn display_label(&self) -> String {
        let fmt = |date: Option<NaiveDate>| {
            date.map(|d| d.to_string()).unwrap_or_else(|| "?".to_string())
        };
        format!("{} - {}", fmt(self.start_date), fmt(self.due_date))
    }
}

impl DateWindowed for Iteration {
    fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Epic {
    pub id: u64,
    pub title: String,
}

/// Picks the item whose date window contains `today`, preferring the
/// earliest due date and keeping provider order on ties. Every
/// candidate is scanned; an empty result means "nothing active" and is
/// not an error.
pub fn active_item<T: DateWindowed>(items: &[T], today: NaiveDate) -> Option<&T> {
    items
        .iter()
        .filter(|item| item.contains(today))
        .fold(None, |best: Option<&T>, item| match best {
            Some(current) if current.due_date() <= item.due_date() => Some(current),
            _ => Some(item),
        })
}
