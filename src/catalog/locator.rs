use std::fmt;

/// Where a recording and its image live inside the lesson tree.
///
/// The tree is laid out as `{lesson}[/{sub_unit}][/{sub_section}]/audio.<ext>`,
/// with `image.<ext>` next to every recording.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceLocator {
    Lesson {
        lesson: String,
    },
    SubUnit {
        lesson: String,
        sub_unit: String,
    },
    SubSection {
        lesson: String,
        sub_unit: String,
        sub_section: String,
    },
}

impl ResourceLocator {
    pub fn lesson(lesson: impl Into<String>) -> Self {
        Self::Lesson { lesson: lesson.into() }
    }

    pub fn sub_unit(lesson: impl Into<String>, sub_unit: impl Into<String>) -> Self {
        Self::SubUnit {
            lesson: lesson.into(),
            sub_unit: sub_unit.into(),
        }
    }

    pub fn sub_section(
        lesson: impl Into<String>,
        sub_unit: impl Into<String>,
        sub_section: impl Into<String>,
    ) -> Self {
        Self::SubSection {
            lesson: lesson.into(),
            sub_unit: sub_unit.into(),
            sub_section: sub_section.into(),
        }
    }

    pub fn lesson_id(&self) -> &str {
        match self {
            Self::Lesson { lesson }
            | Self::SubUnit { lesson, .. }
            | Self::SubSection { lesson, .. } => lesson.as_str(),
        }
    }

    fn segments(&self) -> Vec<&str> {
        match self {
            Self::Lesson { lesson } => vec![lesson.as_str()],
            Self::SubUnit { lesson, sub_unit } => vec![lesson.as_str(), sub_unit.as_str()],
            Self::SubSection { lesson, sub_unit, sub_section } => {
                vec![lesson.as_str(), sub_unit.as_str(), sub_section.as_str()]
            }
        }
    }

    /// Directory of this node relative to the content base, `/`-separated.
    pub fn relative_dir(&self) -> String {
        self.segments().join("/")
    }

    pub fn audio_path(&self, extension: &str) -> String {
        format!("{}/audio.{}", self.relative_dir(), extension.trim_start_matches('.'))
    }

    pub fn image_path(&self, extension: &str) -> String {
        format!("{}/image.{}", self.relative_dir(), extension.trim_start_matches('.'))
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_dir())
    }
}
