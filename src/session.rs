use chrono::{DateTime, Duration, Utc};

use crate::models::{AffiliateRecord, SortState};
use crate::sort;

/// How long a failure banner stays up before it dismisses itself.
pub const ERROR_DISMISS_SECS: i64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed {
        message: String,
        failed_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub enum Command {
    FetchStarted,
    DataLoaded(Vec<AffiliateRecord>),
    LoadFailed {
        message: String,
        at: DateTime<Utc>,
    },
    SetSortField(String),
    ToggleSortOrder,
    DismissError,
    Tick(DateTime<Utc>),
}

/// Side effects the host surface should carry out, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ShowLoading,
    HideLoading,
    Render,
    ShowError(String),
    HideError,
}

#[derive(Debug)]
pub struct Session {
    pub records: Vec<AffiliateRecord>,
    pub sort: SortState,
    pub phase: Phase,
}

impl Session {
    pub fn new(sort: SortState) -> Session {
        Session {
            records: Vec::new(),
            sort,
            phase: Phase::Idle,
        }
    }

    pub fn apply(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::FetchStarted => {
                self.phase = Phase::Loading;
                vec![Effect::ShowLoading, Effect::HideError]
            }
            Command::DataLoaded(records) => {
                // The collection is replaced wholesale; the sort state is not reset.
                self.records = records;
                sort::sort_records(&mut self.records, &self.sort);
                self.phase = Phase::Ready;
                vec![Effect::HideLoading, Effect::Render]
            }
            Command::LoadFailed { message, at } => {
                self.phase = Phase::Failed {
                    message: message.clone(),
                    failed_at: at,
                };
                vec![Effect::HideLoading, Effect::ShowError(message)]
            }
            Command::SetSortField(field) => {
                self.sort.field = field;
                sort::sort_records(&mut self.records, &self.sort);
                vec![Effect::Render]
            }
            Command::ToggleSortOrder => {
                self.sort.order = self.sort.order.toggled();
                sort::sort_records(&mut self.records, &self.sort);
                vec![Effect::Render]
            }
            Command::DismissError => match self.phase {
                Phase::Failed { .. } => {
                    self.phase = Phase::Idle;
                    vec![Effect::HideError]
                }
                _ => Vec::new(),
            },
            Command::Tick(at) => match &self.phase {
                Phase::Failed { failed_at, .. }
                    if at - *failed_at >= Duration::seconds(ERROR_DISMISS_SECS) =>
                {
                    self.phase = Phase::Idle;
                    vec![Effect::HideError]
                }
                _ => Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortOrder;

    fn record(code: &str, total_wagered: f64) -> AffiliateRecord {
        AffiliateRecord {
            code: code.to_string(),
            total_wagered,
            ..AffiliateRecord::default()
        }
    }

    fn new_session() -> Session {
        Session::new(SortState {
            field: "total_wagered".to_string(),
            order: SortOrder::Desc,
        })
    }

    #[test]
    fn fetch_started_shows_loading_and_clears_error() {
        let mut session = new_session();
        let effects = session.apply(Command::FetchStarted);
        assert_eq!(effects, vec![Effect::ShowLoading, Effect::HideError]);
        assert_eq!(session.phase, Phase::Loading);
    }

    #[test]
    fn data_loaded_sorts_and_renders() {
        let mut session = new_session();
        session.apply(Command::FetchStarted);
        let effects = session.apply(Command::DataLoaded(vec![
            record("low", 5.0),
            record("high", 20.0),
        ]));

        assert_eq!(effects, vec![Effect::HideLoading, Effect::Render]);
        assert_eq!(session.phase, Phase::Ready);
        assert_eq!(session.records[0].code, "high");
    }

    #[test]
    fn load_failure_surfaces_the_message() {
        let mut session = new_session();
        session.apply(Command::FetchStarted);
        let effects = session.apply(Command::LoadFailed {
            message: "Failed to load affiliate data. Please try again.".to_string(),
            at: Utc::now(),
        });

        assert_eq!(
            effects,
            vec![
                Effect::HideLoading,
                Effect::ShowError("Failed to load affiliate data. Please try again.".to_string()),
            ]
        );
        assert!(matches!(session.phase, Phase::Failed { .. }));
    }

    #[test]
    fn error_banner_auto_dismisses_after_the_delay() {
        let mut session = new_session();
        let failed_at = Utc::now();
        session.apply(Command::LoadFailed {
            message: "boom".to_string(),
            at: failed_at,
        });

        let early = failed_at + Duration::seconds(ERROR_DISMISS_SECS - 1);
        assert!(session.apply(Command::Tick(early)).is_empty());
        assert!(matches!(session.phase, Phase::Failed { .. }));

        let due = failed_at + Duration::seconds(ERROR_DISMISS_SECS);
        assert_eq!(session.apply(Command::Tick(due)), vec![Effect::HideError]);
        assert_eq!(session.phase, Phase::Idle);
    }

    #[test]
    fn sort_commands_rerender_stale_data_after_a_failure() {
        let mut session = new_session();
        session.apply(Command::DataLoaded(vec![
            record("low", 5.0),
            record("high", 20.0),
        ]));
        session.apply(Command::LoadFailed {
            message: "boom".to_string(),
            at: Utc::now(),
        });

        let effects = session.apply(Command::ToggleSortOrder);
        assert_eq!(effects, vec![Effect::Render]);
        assert_eq!(session.sort.order, SortOrder::Asc);
        assert_eq!(session.records[0].code, "low");
    }

    #[test]
    fn sort_field_survives_a_data_reload() {
        let mut session = new_session();
        session.apply(Command::SetSortField("code".to_string()));
        session.apply(Command::ToggleSortOrder);
        session.apply(Command::DataLoaded(vec![
            record("zeta", 1.0),
            record("alpha", 2.0),
        ]));

        assert_eq!(session.sort.field, "code");
        assert_eq!(session.sort.order, SortOrder::Asc);
        assert_eq!(session.records[0].code, "alpha");
    }

    #[test]
    fn dismiss_is_a_noop_outside_the_failed_phase() {
        let mut session = new_session();
        assert!(session.apply(Command::DismissError).is_empty());

        session.apply(Command::DataLoaded(Vec::new()));
        assert!(session.apply(Command::DismissError).is_empty());
        assert_eq!(session.phase, Phase::Ready);
    }

    #[test]
    fn manual_dismiss_clears_a_failure() {
        let mut session = new_session();
        session.apply(Command::LoadFailed {
            message: "boom".to_string(),
            at: Utc::now(),
        });
        assert_eq!(session.apply(Command::DismissError), vec![Effect::HideError]);
        assert_eq!(session.phase, Phase::Idle);
    }

    #[test]
    fn server_error_cycle_ends_dismissed() {
        // HTTP failure surfaces the generic message, then the banner expires.
        let mut session = new_session();
        session.apply(Command::FetchStarted);

        let failed_at = Utc::now();
        let message =
            crate::api::ApiError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR).user_message();
        let effects = session.apply(Command::LoadFailed {
            message: message.clone(),
            at: failed_at,
        });
        assert!(effects.contains(&Effect::ShowError(message)));

        let effects =
            session.apply(Command::Tick(failed_at + Duration::seconds(ERROR_DISMISS_SECS)));
        assert_eq!(effects, vec![Effect::HideError]);
        assert_eq!(session.phase, Phase::Idle);
    }
}
