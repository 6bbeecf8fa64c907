use kubeinspect_core::ReportKind;

/// Answers to "Is this the correct cluster?"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmChoice {
    Yes,
    No,
    Exit,
}

impl ConfirmChoice {
    pub const ALL: [ConfirmChoice; 3] = [Self::Yes, Self::No, Self::Exit];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No, pick another context",
            Self::Exit => "Exit",
        }
    }
}

/// Entries of the main action menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Report(ReportKind),
    Logs,
    SwitchContext,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 7] = [
        Self::Report(ReportKind::Images),
        Self::Report(ReportKind::Resources),
        Self::Report(ReportKind::Replicas),
        Self::Report(ReportKind::Metrics),
        Self::Logs,
        Self::SwitchContext,
        Self::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Report(ReportKind::Images) => "Get Container Images",
            Self::Report(ReportKind::Resources) => "Get Resource Requests & Limits",
            Self::Report(ReportKind::Replicas) => "Get Replica Counts",
            Self::Report(ReportKind::Metrics) => "Get Pod Metrics",
            Self::Logs => "Get Workload Logs",
            Self::SwitchContext => "Switch Context",
            Self::Exit => "Exit",
        }
    }

    /// Whether choosing this item continues with a namespace pick
    pub fn needs_namespace(&self) -> bool {
        matches!(self, Self::Report(_) | Self::Logs)
    }
}
