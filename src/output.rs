use crate::model::Task;

pub fn format_task_detail(task: &Task) -> String {
    let mut out = String::new();
    out.push_str(&format!("Id:        {}\n", task.id));
    out.push_str(&format!("Name:      {}\n", task.name));
    out.push_str(&format!("Status:    {}\n", task.status));
    if let Some(kind) = task.kind {
        out.push_str(&format!("Kind:      {kind}\n"));
    }
    if task.duration_minutes > 0 {
        out.push_str(&format!("Duration:  {}m\n", task.duration_minutes));
    }
    out.push_str(&format!(
        "Done:      {}\n",
        if task.done { "yes" } else { "no" }
    ));
    out
}

pub fn format_task_list(tasks: &[&Task]) -> String {
    let mut out = String::new();
    for task in tasks {
        let kind = task.kind.map(|k| format!("  ({k})")).unwrap_or_default();
        let minutes = if task.duration_minutes > 0 {
            format!("  {}m", task.duration_minutes)
        } else {
            String::new()
        };
        out.push_str(&format!(
            "{} {:>3}  {} [{}]{}{}\n",
            task.checkbox(),
            task.id,
            task.name,
            task.status,
            kind,
            minutes
        ));
    }
    out
}
