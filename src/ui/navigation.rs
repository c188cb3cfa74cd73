// Which lesson/sub-unit/sub-section is open, and what the player should be playing.

use crate::catalog::{LessonConfig, LessonSummary, ResourceLocator, SubSection, SubUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    /// Sub-unit list of a lesson.
    Lesson,
    /// Lesson without sub-units, played as a whole.
    DirectLesson,
    /// Full sub-unit recording plus its sub-section list.
    SubUnit,
    SubSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

/// What the player should mount: the triple handed to a playback session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRequest {
    pub locator: ResourceLocator,
    pub title: String,
    pub auto_play: bool,
}

/// One row of the list pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Default)]
pub struct Navigator {
    lessons: Vec<LessonSummary>,
    view: View,
    lesson: Option<LessonSummary>,
    config: Option<LessonConfig>,
    sub_unit: Option<usize>,
    sub_section: Option<usize>,
    auto_play: bool,
}

impl Navigator {
    pub fn new(lessons: Vec<LessonSummary>) -> Self {
        Self {
            lessons,
            ..Self::default()
        }
    }

    pub fn set_lessons(&mut self, lessons: Vec<LessonSummary>) {
        self.lessons = lessons;
    }

    pub fn lessons(&self) -> &[LessonSummary] {
        &self.lessons
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn lesson_config(&self) -> Option<&LessonConfig> {
        self.config.as_ref()
    }

    pub fn current_sub_unit(&self) -> Option<&SubUnit> {
        let config = self.config.as_ref()?;
        config.sub_units.get(self.sub_unit?)
    }

    pub fn current_sub_section(&self) -> Option<&SubSection> {
        self.current_sub_unit()?.sub_sections.get(self.sub_section?)
    }

    pub fn open_lesson(&mut self, summary: LessonSummary, config: LessonConfig) {
        self.view = if config.is_direct() {
            View::DirectLesson
        } else {
            View::Lesson
        };
        self.lesson = Some(summary);
        self.config = Some(config);
        self.sub_unit = None;
        self.sub_section = None;
        self.auto_play = false;
    }

    pub fn select_sub_unit(&mut self, index: usize, auto_play: bool) -> bool {
        let Some(config) = &self.config else {
            return false;
        };
        if index >= config.sub_units.len() {
            return false;
        }
        self.sub_unit = Some(index);
        self.sub_section = None;
        self.view = View::SubUnit;
        self.auto_play = auto_play;
        true
    }

    pub fn select_sub_section(&mut self, index: usize) -> bool {
        let in_range = self
            .current_sub_unit()
            .is_some_and(|unit| index < unit.sub_sections.len());
        if !in_range {
            return false;
        }
        self.sub_section = Some(index);
        self.view = View::SubSection;
        self.auto_play = false;
        true
    }

    /// Moves to the neighbouring sub-unit, wrapping at both ends, and starts it playing.
    pub fn step_sub_unit(&mut self, step: Step) -> bool {
        if !matches!(self.view, View::SubUnit | View::SubSection) {
            return false;
        }
        let (Some(config), Some(current)) = (&self.config, self.sub_unit) else {
            return false;
        };
        let count = config.sub_units.len();
        if count == 0 {
            return false;
        }
        let next = match step {
            Step::Next => (current + 1) % count,
            Step::Previous => (current + count - 1) % count,
        };
        self.select_sub_unit(next, true)
    }

    /// Goes up one level. Returns the row of the parent list to highlight (the one
    /// just left), or `None` when already home.
    pub fn back(&mut self) -> Option<usize> {
        let anchor = match self.view {
            View::Home => return None,
            View::Lesson | View::DirectLesson => {
                let anchor = self
                    .lesson
                    .as_ref()
                    .and_then(|lesson| self.lessons.iter().position(|l| l.id == lesson.id))
                    .unwrap_or(0);
                self.home();
                anchor
            }
            View::SubUnit => {
                self.view = View::Lesson;
                self.sub_unit.take().unwrap_or(0)
            }
            View::SubSection => {
                self.view = View::SubUnit;
                self.sub_section.take().unwrap_or(0)
            }
        };
        self.auto_play = false;
        Some(anchor)
    }

    pub fn home(&mut self) {
        self.view = View::Home;
        self.lesson = None;
        self.config = None;
        self.sub_unit = None;
        self.sub_section = None;
        self.auto_play = false;
    }

    pub fn breadcrumbs(&self) -> Vec<String> {
        let mut crumbs = vec!["Home".to_string()];
        if self.view == View::Home {
            return crumbs;
        }
        if let Some(lesson) = &self.lesson {
            crumbs.push(lesson.title.clone());
        }
        if let Some(unit) = self.current_sub_unit() {
            crumbs.push(unit.title.clone());
        }
        if let Some(section) = self.current_sub_section() {
            crumbs.push(section.title.clone());
        }
        crumbs
    }

    pub fn player_request(&self) -> Option<PlayerRequest> {
        let config = self.config.as_ref()?;
        let (locator, title) = match self.view {
            View::Home | View::Lesson => return None,
            View::DirectLesson => (ResourceLocator::lesson(&config.id), config.title.clone()),
            View::SubUnit => {
                let unit = self.current_sub_unit()?;
                (
                    ResourceLocator::sub_unit(&config.id, &unit.id),
                    format!("{} - Full", unit.title),
                )
            }
            View::SubSection => {
                let unit = self.current_sub_unit()?;
                let section = self.current_sub_section()?;
                (
                    ResourceLocator::sub_section(&config.id, &unit.id, &section.id),
                    section.title.clone(),
                )
            }
        };

        Some(PlayerRequest {
            locator,
            title,
            auto_play: self.auto_play,
        })
    }

    /// Rows of the selectable list for the current view.
    pub fn list_entries(&self) -> Vec<ListEntry> {
        match self.view {
            View::Home => self
                .lessons
                .iter()
                .map(|lesson| ListEntry {
                    title: lesson.title.clone(),
                    detail: lesson.description.clone(),
                })
                .collect(),
            View::Lesson => self
                .config
                .iter()
                .flat_map(|config| config.sub_units.iter())
                .map(|unit| ListEntry {
                    title: unit.title.clone(),
                    detail: match unit.sub_sections.len() {
                        0 => "Audio".to_string(),
                        n => format!("{} Panasas · Audio", n),
                    },
                })
                .collect(),
            View::SubUnit => self
                .current_sub_unit()
                .map(|unit| {
                    unit.sub_sections
                        .iter()
                        .map(|section| ListEntry {
                            title: section.title.clone(),
                            detail: "Practice".to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            View::DirectLesson | View::SubSection => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson_summary(id: &str, title: &str) -> LessonSummary {
        LessonSummary {
            id: id.into(),
            title: title.into(),
            description: String::new(),
        }
    }

    fn unit(id: &str, sections: &[&str]) -> SubUnit {
        SubUnit {
            id: id.into(),
            title: format!("Anuvakam {}", id),
            sub_sections: sections
                .iter()
                .map(|s| SubSection {
                    id: (*s).into(),
                    title: format!("Panasa {}", s),
                })
                .collect(),
        }
    }

    fn lesson_with_units() -> (LessonSummary, LessonConfig) {
        let config = LessonConfig {
            id: "tu".into(),
            title: "Taittiriya".into(),
            description: String::new(),
            sub_units: vec![unit("1", &["a", "b"]), unit("2", &[]), unit("3", &["c"])],
        };
        (lesson_summary("tu", "Taittiriya Upanishad"), config)
    }

    #[test]
    fn test_direct_lesson_plays_lesson_audio() {
        let mut nav = Navigator::new(vec![lesson_summary("shanti", "Shanti")]);
        nav.open_lesson(
            lesson_summary("shanti", "Shanti"),
            LessonConfig {
                id: "shanti".into(),
                title: "Shanti Mantras".into(),
                description: String::new(),
                sub_units: Vec::new(),
            },
        );

        assert_eq!(nav.view(), View::DirectLesson);
        let request = nav.player_request().unwrap();
        assert_eq!(request.locator, ResourceLocator::lesson("shanti"));
        assert_eq!(request.title, "Shanti Mantras");
        assert!(!request.auto_play);
        assert!(nav.list_entries().is_empty());
    }

    #[test]
    fn test_drill_down_and_titles() {
        let (summary, config) = lesson_with_units();
        let mut nav = Navigator::new(vec![summary.clone()]);
        nav.open_lesson(summary, config);
        assert_eq!(nav.view(), View::Lesson);
        assert_eq!(nav.player_request(), None);
        assert_eq!(nav.list_entries()[0].detail, "2 Panasas · Audio");
        assert_eq!(nav.list_entries()[1].detail, "Audio");

        assert!(nav.select_sub_unit(0, false));
        let request = nav.player_request().unwrap();
        assert_eq!(request.locator, ResourceLocator::sub_unit("tu", "1"));
        assert_eq!(request.title, "Anuvakam 1 - Full");
        assert_eq!(nav.list_entries().len(), 2);

        assert!(nav.select_sub_section(1));
        let request = nav.player_request().unwrap();
        assert_eq!(request.locator, ResourceLocator::sub_section("tu", "1", "b"));
        assert_eq!(request.title, "Panasa b");
        assert!(!request.auto_play);
        assert_eq!(
            nav.breadcrumbs(),
            vec!["Home", "Taittiriya Upanishad", "Anuvakam 1", "Panasa b"]
        );

        assert!(!nav.select_sub_section(5));
        assert!(!nav.select_sub_unit(9, false));
    }

    #[test]
    fn test_step_wraps_and_auto_plays() {
        let (summary, config) = lesson_with_units();
        let mut nav = Navigator::default();
        nav.open_lesson(summary, config);

        assert!(!nav.step_sub_unit(Step::Next));

        nav.select_sub_unit(2, false);
        assert!(nav.step_sub_unit(Step::Next));
        assert_eq!(nav.current_sub_unit().unwrap().id, "1");
        assert!(nav.player_request().unwrap().auto_play);

        assert!(nav.step_sub_unit(Step::Previous));
        assert_eq!(nav.current_sub_unit().unwrap().id, "3");

        // stepping from a sub-section lands on the neighbouring full sub-unit
        nav.select_sub_section(0);
        assert!(nav.step_sub_unit(Step::Previous));
        assert_eq!(nav.view(), View::SubUnit);
        assert_eq!(nav.current_sub_unit().unwrap().id, "2");
        assert_eq!(nav.current_sub_section(), None);
    }

    #[test]
    fn test_back_and_home() {
        let (summary, config) = lesson_with_units();
        let mut nav = Navigator::new(vec![lesson_summary("x", "X"), summary.clone()]);
        nav.open_lesson(summary, config);
        nav.select_sub_unit(0, true);
        nav.select_sub_section(1);

        assert_eq!(nav.back(), Some(1));
        assert_eq!(nav.view(), View::SubUnit);
        assert!(!nav.player_request().unwrap().auto_play);

        assert_eq!(nav.back(), Some(0));
        assert_eq!(nav.view(), View::Lesson);
        assert_eq!(nav.breadcrumbs(), vec!["Home", "Taittiriya Upanishad"]);

        assert_eq!(nav.back(), Some(1));
        assert_eq!(nav.view(), View::Home);
        assert_eq!(nav.breadcrumbs(), vec!["Home"]);
        assert_eq!(nav.back(), None);

        nav.open_lesson(lesson_summary("tu", "T"), lesson_with_units().1);
        nav.select_sub_unit(1, false);
        nav.home();
        assert_eq!(nav.view(), View::Home);
        assert!(nav.lesson_config().is_none());
        assert_eq!(nav.player_request(), None);
    }
}
