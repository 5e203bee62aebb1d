//! Implements InputPort. Inquire-based interactive menu.
//!
//! Forms for teachers, rooms and courses; course cards; CSV import/export.

use crate::adapters::ui::banner::{INDIGO, PURPLE};
use crate::adapters::ui::progress::import_bar;
use crate::adapters::ui::render::{conflict_message, course_card, import_summary};
use crate::domain::{CourseDraft, DomainError, Shift, Weekday};
use crate::ports::InputPort;
use crate::usecases::{Admission, BookingService, TransferService};
use async_trait::async_trait;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{CustomType, DateSelect, InquireError, MultiSelect, Select, Text};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

/// Applies the indigo/purple theme to every subsequent inquire prompt.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("?").with_fg(rgb(PURPLE)))
        .with_highlighted_option_prefix(Styled::new("›").with_fg(rgb(INDIGO)))
        .with_selected_checkbox(Styled::new("[x]").with_fg(rgb(PURPLE)))
        .with_answer(StyleSheet::new().with_fg(rgb(INDIGO)));
    inquire::set_global_render_config(config);
}

const CANCELLED: &str = "cancelled";

fn ui_err(e: InquireError) -> DomainError {
    match e {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            DomainError::Ui(CANCELLED.to_string())
        }
        other => DomainError::Ui(other.to_string()),
    }
}

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    AddTeacher,
    AddRoom,
    AddCourse,
    ListCourses,
    ListPeople,
    Import,
    Export,
    Exit,
}

impl MenuItem {
    const ALL: [MenuItem; 8] = [
        MenuItem::AddCourse,
        MenuItem::ListCourses,
        MenuItem::AddTeacher,
        MenuItem::AddRoom,
        MenuItem::ListPeople,
        MenuItem::Import,
        MenuItem::Export,
        MenuItem::Exit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::AddTeacher => "Add teacher",
            MenuItem::AddRoom => "Add room",
            MenuItem::AddCourse => "Add course",
            MenuItem::ListCourses => "List courses",
            MenuItem::ListPeople => "List teachers and rooms",
            MenuItem::Import => "Import CSV",
            MenuItem::Export => "Export CSV",
            MenuItem::Exit => "Exit",
        })
    }
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    bookings: Arc<BookingService>,
    transfer: Arc<TransferService>,
    sheet_path: PathBuf,
}

impl TuiInputPort {
    pub fn new(
        bookings: Arc<BookingService>,
        transfer: Arc<TransferService>,
        sheet_path: PathBuf,
    ) -> Self {
        Self {
            bookings,
            transfer,
            sheet_path,
        }
    }

    async fn add_teacher(&self) -> Result<(), DomainError> {
        let name = Text::new("Teacher name:").prompt().map_err(ui_err)?;
        let teacher = self.bookings.add_teacher(&name).await?;
        println!("✓ Teacher '{}' added.", teacher.name);
        Ok(())
    }

    async fn add_room(&self) -> Result<(), DomainError> {
        let name = Text::new("Room name:").prompt().map_err(ui_err)?;
        let capacity = CustomType::<u32>::new("Capacity:")
            .with_error_message("Enter a whole number")
            .prompt()
            .map_err(ui_err)?;
        let room = self.bookings.add_room(&name, capacity).await?;
        println!("✓ Room '{}' added (capacity {}).", room.name, room.capacity);
        Ok(())
    }

    async fn add_course(&self) -> Result<(), DomainError> {
        let teachers = self.bookings.list_teachers().await?;
        let rooms = self.bookings.list_rooms().await?;
        if teachers.is_empty() || rooms.is_empty() {
            println!("Add at least one teacher and one room first.");
            return Ok(());
        }

        let name = Text::new("Course name:").prompt().map_err(ui_err)?;
        let start_date = DateSelect::new("Start date:").prompt().map_err(ui_err)?;
        let end_date = DateSelect::new("End date:")
            .with_starting_date(start_date)
            .prompt()
            .map_err(ui_err)?;

        let teacher_names: Vec<String> = teachers.iter().map(|t| t.name.clone()).collect();
        let teacher = Select::new("Teacher:", teacher_names)
            .raw_prompt()
            .map_err(ui_err)?;
        let room_labels: Vec<String> = rooms
            .iter()
            .map(|r| format!("{} (capacity {})", r.name, r.capacity))
            .collect();
        let room = Select::new("Room:", room_labels)
            .raw_prompt()
            .map_err(ui_err)?;

        let shift = Select::new("Shift:", Shift::ALL.to_vec())
            .prompt()
            .map_err(ui_err)?;
        let weekdays = MultiSelect::new("Weekdays:", Weekday::ALL.to_vec())
            .prompt()
            .map_err(ui_err)?;

        let draft = CourseDraft {
            name,
            start_date,
            end_date,
            teacher_id: teachers[teacher.index].id.clone(),
            room_id: rooms[room.index].id.clone(),
            shift,
            weekdays: weekdays.into_iter().collect(),
        };
        match self.bookings.add_course(draft).await? {
            Admission::Accepted(course) => println!("✓ Course '{}' booked.", course.name),
            Admission::Rejected(conflict) => println!("✗ {}", conflict_message(&conflict)),
        }
        Ok(())
    }

    async fn list_courses(&self) -> Result<(), DomainError> {
        let courses = self.bookings.list_courses().await?;
        if courses.is_empty() {
            println!("No courses yet.");
            return Ok(());
        }
        let teachers: HashMap<String, String> = self
            .bookings
            .list_teachers()
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();
        let rooms: HashMap<String, String> = self
            .bookings
            .list_rooms()
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        let today = chrono::Local::now().date_naive();
        let window = self.bookings.ending_soon_days();
        for course in &courses {
            let teacher = teachers.get(&course.teacher_id).map_or("?", String::as_str);
            let room = rooms.get(&course.room_id).map_or("?", String::as_str);
            println!("{}", course_card(course, teacher, room, today, window));
        }

        let ending = self.bookings.courses_ending_soon(today).await?;
        if !ending.is_empty() {
            println!("{} course(s) end within {} days.", ending.len(), window);
        }
        Ok(())
    }

    async fn list_people(&self) -> Result<(), DomainError> {
        println!("Teachers:");
        for t in self.bookings.list_teachers().await? {
            println!("  • {}", t.name);
        }
        println!("Rooms:");
        for r in self.bookings.list_rooms().await? {
            println!("  • {} (capacity {})", r.name, r.capacity);
        }
        Ok(())
    }

    fn ask_path(&self, prompt: &str) -> Result<PathBuf, DomainError> {
        let default = self.sheet_path.display().to_string();
        let path = Text::new(prompt)
            .with_default(&default)
            .prompt()
            .map_err(ui_err)?;
        Ok(PathBuf::from(path))
    }

    async fn import(&self) -> Result<(), DomainError> {
        let path = self.ask_path("CSV file to import:")?;
        let bar = import_bar(0);
        let report = self
            .transfer
            .import_sheet(&path, |total, name| {
                bar.set_length(total as u64);
                bar.set_message(name.to_string());
                bar.inc(1);
            })
            .await;
        bar.finish_and_clear();
        print!("{}", import_summary(&report?));
        Ok(())
    }

    async fn export(&self) -> Result<(), DomainError> {
        let path = self.ask_path("Export to:")?;
        let rows = self.transfer.export_sheet(&path).await?;
        println!("✓ Exported {} course(s) to {}.", rows, path.display());
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let choice = match Select::new("What next?", MenuItem::ALL.to_vec()).prompt() {
                Ok(choice) => choice,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(());
                }
                Err(e) => return Err(ui_err(e)),
            };

            let result = match choice {
                MenuItem::AddTeacher => self.add_teacher().await,
                MenuItem::AddRoom => self.add_room().await,
                MenuItem::AddCourse => self.add_course().await,
                MenuItem::ListCourses => self.list_courses().await,
                MenuItem::ListPeople => self.list_people().await,
                MenuItem::Import => self.import().await,
                MenuItem::Export => self.export().await,
                MenuItem::Exit => return Ok(()),
            };

            // Esc inside a form returns to the menu; everything else is reported and the session goes on.
            match result {
                Ok(()) => {}
                Err(DomainError::Ui(ref msg)) if msg == CANCELLED => {}
                Err(e) => {
                    warn!(action = %choice, error = %e, "action failed");
                    println!("✗ {}", e);
                }
            }
        }
    }
}
