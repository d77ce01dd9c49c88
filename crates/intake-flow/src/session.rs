/// Position of a user inside the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Idle,
    Number,
    Type,
    Description,
    Confirm,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Number => "number",
            Self::Type => "type",
            Self::Description => "description",
            Self::Confirm => "confirm",
        }
    }
}

/// In-progress request fields for one user.
///
/// Fields fill in step order. An idle session rejects every field write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    step: Step,
    identifier: Option<String>,
    category: Option<String>,
    description: Option<String>,
}

impl Session {
    /// A fresh session waiting for the vehicle identifier.
    pub fn started() -> Self {
        Self {
            step: Step::Number,
            ..Self::default()
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn go_to(&mut self, step: Step) {
        self.step = step;
    }

    pub(crate) fn record_identifier(&mut self, identifier: String) -> bool {
        if self.step == Step::Idle {
            return false;
        }
        self.identifier = Some(identifier);
        true
    }

    pub(crate) fn record_category(&mut self, category: String) -> bool {
        if self.step == Step::Idle {
            return false;
        }
        self.category = Some(category);
        true
    }

    pub(crate) fn record_description(&mut self, description: String) -> bool {
        if self.step == Step::Idle {
            return false;
        }
        self.description = Some(description);
        true
    }
}
