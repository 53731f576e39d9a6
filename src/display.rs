//! Text rendering of courses and instances for the terminal front end.

use std::str::FromStr;

use colored::{ColoredString, Colorize};
use tracing::debug;

use crate::courses::PrerequisiteRef;
use crate::error::FieldErrors;
use crate::models::{Course, InstanceView};
use crate::notice::{Notice, NoticeKind};

const SNIPPET_LEN: usize = 80;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Rendering context handed to every renderer. Created once with [`DisplayContext::mount`]
/// and released with [`DisplayContext::unmount`].
#[derive(Debug)]
pub struct DisplayContext {
    theme: Theme,
    color: bool,
}

impl DisplayContext {
    pub fn mount(theme: Theme, color: bool) -> Self {
        debug!("display context mounted (theme {:?}, color {})", theme, color);
        Self { theme, color }
    }

    /// Uncolored context, used by tests and piped output.
    pub fn plain() -> Self {
        Self {
            theme: Theme::System,
            color: false,
        }
    }

    pub fn unmount(self) {
        debug!("display context unmounted (theme {:?})", self.theme);
    }

    fn heading(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled: ColoredString = match self.theme {
            Theme::Dark => text.bright_cyan().bold(),
            Theme::Light | Theme::System => text.blue().bold(),
        };
        styled.to_string()
    }

    fn muted(&self, text: &str) -> String {
        if self.color { text.dimmed().to_string() } else { text.to_string() }
    }

    fn alert(&self, text: &str) -> String {
        if self.color { text.red().bold().to_string() } else { text.to_string() }
    }

    fn ok(&self, text: &str) -> String {
        if self.color { text.green().to_string() } else { text.to_string() }
    }
}

pub fn snippet(description: &str) -> String {
    if description.chars().count() > SNIPPET_LEN {
        let cut: String = description.chars().take(SNIPPET_LEN).collect();
        format!("{}...", cut)
    } else {
        description.to_string()
    }
}

pub fn course_table(ctx: &DisplayContext, courses: &[Course]) -> String {
    if courses.is_empty() {
        return format!(
            "{}\n{}\n",
            ctx.heading("No Courses Yet"),
            ctx.muted("Looks like there are no courses available. Why not add the first one?")
        );
    }

    let mut out = String::new();
    out.push_str(&format!("{}\n", ctx.heading("Available Courses")));
    out.push_str(&format!("{:<6} {:<10} {:<32} {}\n", "ID", "CODE", "NAME", "DESCRIPTION"));
    for course in courses {
        out.push_str(&format!(
            "{:<6} {:<10} {:<32} {}\n",
            course.id,
            course.code,
            course.name,
            ctx.muted(&snippet(&course.description))
        ));
    }
    out
}

pub fn course_details(ctx: &DisplayContext, course: &Course, prerequisites: &[PrerequisiteRef<'_>]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", ctx.heading("Course Details")));
    out.push_str(&format!("Code:        {}\n", course.code));
    out.push_str(&format!("Name:        {}\n", course.name));
    out.push_str(&format!("Description: {}\n", course.description));
    if prerequisites.is_empty() {
        out.push_str(&format!("Prerequisites: {}\n", ctx.muted("none")));
    } else {
        out.push_str("Prerequisites:\n");
        for prerequisite in prerequisites {
            let line = prerequisite.to_string();
            let line = if prerequisite.is_known() { line } else { ctx.alert(&line) };
            out.push_str(&format!("  - {}\n", line));
        }
    }
    out
}

pub fn instance_table(ctx: &DisplayContext, instances: &[InstanceView]) -> String {
    if instances.is_empty() {
        return format!(
            "{}\n{}\n",
            ctx.heading("No Instances Found"),
            ctx.muted("Try adjusting the filters or add a new instance.")
        );
    }

    let mut out = String::new();
    out.push_str(&format!("{}\n", ctx.heading("Course Instances")));
    out.push_str(&format!(
        "{:<6} {:<32} {:<10} {:<6} {:<9} {}\n",
        "ID", "COURSE", "CODE", "YEAR", "SEMESTER", "INSTRUCTOR"
    ));
    for instance in instances {
        out.push_str(&format!(
            "{:<6} {:<32} {:<10} {:<6} {:<9} {}\n",
            instance.id,
            instance.course_name,
            instance.course_code,
            instance.year,
            instance.semester,
            instance.instructor
        ));
    }
    out
}

pub fn instance_details(ctx: &DisplayContext, instance: &InstanceView) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", ctx.heading("Instance Details")));
    out.push_str(&format!("Course:     {} ({})\n", instance.course_name, instance.course_code));
    out.push_str(&format!("Year:       {}\n", instance.year));
    out.push_str(&format!("Semester:   {}\n", instance.semester));
    out.push_str(&format!("Instructor: {}\n", instance.instructor));
    if !instance.course_description.is_empty() {
        out.push_str(&format!("Course Description: {}\n", instance.course_description));
    }
    out
}

pub fn notice(ctx: &DisplayContext, notice: &Notice) -> String {
    match notice.kind {
        NoticeKind::Success => format!("{} {}", ctx.ok(&notice.title), notice.description),
        NoticeKind::Error => format!("{} {}", ctx.alert(&notice.title), notice.description),
    }
}

pub fn field_errors(ctx: &DisplayContext, errors: &FieldErrors) -> String {
    let mut out = String::new();
    for (field, messages) in errors.fields() {
        for message in messages {
            out.push_str(&format!("  {}: {}\n", ctx.alert(field), message));
        }
    }
    out
}
