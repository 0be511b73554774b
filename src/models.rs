use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named REST collection on the backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Resource {
    #[default]
    Employees,
    Positions,
    Tasks,
}

impl Resource {
    /// Path segment under the base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Employees => "employees",
            Resource::Positions => "positions",
            Resource::Tasks => "tasks",
        }
    }

    /// Singular label for toasts and table titles
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Employees => "Employee",
            Resource::Positions => "Position",
            Resource::Tasks => "Task",
        }
    }

    /// Cycle forward, for the search-type selector
    pub fn next(&self) -> Resource {
        match self {
            Resource::Employees => Resource::Positions,
            Resource::Positions => Resource::Tasks,
            Resource::Tasks => Resource::Employees,
        }
    }

    /// Cycle backward
    pub fn prev(&self) -> Resource {
        match self {
            Resource::Employees => Resource::Tasks,
            Resource::Positions => Resource::Employees,
            Resource::Tasks => Resource::Positions,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A person records can be assigned to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
}

/// A role held by an employee over a date range
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: i64,
    pub name: String,
    pub employee_id: i64,
    pub from_date: NaiveDate,
    /// Open-ended positions carry no end date
    pub to_date: Option<NaiveDate>,
}

/// A dated piece of work assigned to an employee
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub employee_id: i64,
    pub date: NaiveDate,
}

/// Creation payload for an employee; the server assigns the id
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
}

/// Creation payload for a position
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub name: String,
    pub employee_id: i64,
    pub from_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
}

/// Creation payload for a task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub name: String,
    pub employee_id: i64,
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_resource_cycle_covers_all() {
        let start = Resource::Employees;
        assert_eq!(start.next().next().next(), start);
        assert_eq!(start.prev(), start.next().next());
    }

    #[test]
    fn test_position_wire_names_are_camel_case() {
        let payload = NewPosition {
            name: String::from("Developer"),
            employee_id: 3,
            from_date: date("2024-01-01"),
            to_date: Some(date("2024-06-30")),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["employeeId"], 3);
        assert_eq!(json["fromDate"], "2024-01-01");
        assert_eq!(json["toDate"], "2024-06-30");
    }

    #[test]
    fn test_open_ended_position_omits_to_date() {
        let payload = NewPosition {
            name: String::from("Lead"),
            employee_id: 1,
            from_date: date("2024-03-15"),
            to_date: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("toDate").is_none());
    }

    #[test]
    fn test_task_deserializes_from_wire_shape() {
        let task: Task = serde_json::from_str(
            r#"{"id":9,"name":"Standup","employeeId":2,"date":"2024-05-20"}"#,
        )
        .unwrap();
        assert_eq!(task.id, 9);
        assert_eq!(task.employee_id, 2);
        assert_eq!(task.date, date("2024-05-20"));
    }
}
