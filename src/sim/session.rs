//! Sampling orchestrator: one session owns the histograms, the selection
//! model and the generator, and routes every simulated user through both
//! selection stages.

use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, trace};

use super::histograms::{HistogramName, HistogramSet, Scaling};
use crate::config::AppConfig;
use crate::core::random::make_rng;
use crate::model::ParamError;
use crate::model::coeffs::{FittedModel, TuningOverrides, load_model_or_fallback};
use crate::model::population::{PopulationParams, sample_user};
use crate::model::selection::{PoliticalModel, PoliticalTweeting, SelectionModel, TopicModel};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct IssueAttitude {
    pub index: usize,
    pub value: f64,
    pub is_selected_topic: bool,
}

/// Everything a presentation layer needs to animate one sampled user.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SampleResult {
    pub mu: f64,
    pub true_mean: f64,
    pub p_political: f64,
    pub is_political: bool,
    /// Set iff `is_political`.
    pub selected_topic: Option<usize>,
    /// Empty unless `is_political`.
    pub attitudes: Vec<IssueAttitude>,
}

impl SampleResult {
    /// Author histogram this user's true mean was routed to.
    pub fn author_histogram(&self) -> HistogramName {
        if self.is_political {
            HistogramName::TweetAuthorsPolitical
        } else {
            HistogramName::TweetAuthorsNonPolitical
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounters {
    pub users: u64,
    pub political: u64,
    pub non_political: u64,
}

pub struct Session {
    population: PopulationParams,
    fallback: PoliticalTweeting,
    selection: SelectionModel,
    histograms: HistogramSet,
    scaling: Scaling,
    static_users: usize,
    rng: StdRng,
    counters: SessionCounters,
}

impl Session {
    /// Validate `config`, load any configured fitted models (best effort), and
    /// populate the static reference histogram.
    pub fn new(config: &AppConfig) -> Result<Self, ParamError> {
        config.validate()?;
        let fallback = config.political_tweeting;
        let political = match load_model_or_fallback(config.models.political_path.as_deref(), "political") {
            Some(m) => PoliticalModel::Fitted(m),
            None => PoliticalModel::Fallback(fallback),
        };
        let topic = match load_model_or_fallback(config.models.topic_path.as_deref(), "topic") {
            Some(m) => TopicModel::Fitted(m),
            None => TopicModel::AbsoluteExtremity,
        };
        let mut session = Self {
            population: config.model.population(),
            fallback,
            selection: SelectionModel {
                political,
                topic,
                political_tuning: config.tuning.political,
                topic_tuning: config.tuning.topic,
            },
            histograms: HistogramSet::new(config.histogram.bins()),
            scaling: config.histogram.scaling,
            static_users: config.sampling.static_users,
            rng: make_rng(config.sampling.seed),
            counters: SessionCounters::default(),
        };
        session.populate_static();
        info!(
            "session ready: n_issues={}, political={}, topic={}",
            session.population.n_issues,
            if session.selection.political.is_fitted() { "fitted" } else { "logistic" },
            if session.selection.topic.is_fitted() { "fitted" } else { "abs-extremity" },
        );
        Ok(session)
    }

    /// Draw one user, decide whether the post is political, pick its topic,
    /// and bin the outcome.
    pub fn sample_one_user(&mut self) -> SampleResult {
        let user = sample_user(&self.population, &mut self.rng);
        let (p_political, is_political) = self
            .selection
            .decide_political(user.true_mean, &mut self.rng);

        self.counters.users += 1;
        if is_political {
            self.counters.political += 1;
        } else {
            self.counters.non_political += 1;
        }

        let mut selected_topic = None;
        let mut attitudes = Vec::new();
        if is_political {
            selected_topic = self.selection.choose_topic(&user.issues, &mut self.rng);
            attitudes.reserve(user.issues.len());
            for (index, &value) in user.issues.iter().enumerate() {
                let is_selected_topic = selected_topic == Some(index);
                let target = if is_selected_topic {
                    HistogramName::PostedAttitudes
                } else {
                    HistogramName::ShadowAttitudes
                };
                self.histograms.add_value(target, value);
                attitudes.push(IssueAttitude {
                    index,
                    value,
                    is_selected_topic,
                });
            }
        }

        trace!(
            true_mean = user.true_mean,
            p_political,
            is_political,
            ?selected_topic,
            "sampled user"
        );
        let result = SampleResult {
            mu: user.mu,
            true_mean: user.true_mean,
            p_political,
            is_political,
            selected_topic,
            attitudes,
        };
        self.histograms
            .add_value(result.author_histogram(), result.true_mean);
        result
    }

    /// Run `n` sampling events; returns how many of them were political.
    pub fn sample_many(&mut self, n: usize) -> usize {
        (0..n).filter(|_| self.sample_one_user().is_political).count()
    }

    /// Refill the static reference histogram from the current population params.
    pub fn populate_static(&mut self) -> u64 {
        self.histograms.populate_static(
            HistogramName::TrueAll,
            self.static_users,
            &self.population,
            &mut self.rng,
        )
    }

    /// Zero every histogram and counter, then repopulate the static reference.
    pub fn reset(&mut self) {
        self.histograms.init_all();
        self.counters = SessionCounters::default();
        self.populate_static();
        debug!("session reset");
    }

    /// Change the number of issues per user. The static reference is redrawn;
    /// already accumulated sample histograms are kept.
    pub fn set_n_issues(&mut self, n_issues: usize) -> Result<(), ParamError> {
        let next = PopulationParams {
            n_issues,
            ..self.population
        };
        next.validate()?;
        self.population = next;
        self.populate_static();
        debug!("n_issues set to {n_issues}");
        Ok(())
    }

    pub fn set_political_tuning(&mut self, tuning: TuningOverrides) {
        self.selection.political_tuning = tuning;
    }

    pub fn set_topic_tuning(&mut self, tuning: TuningOverrides) {
        self.selection.topic_tuning = tuning;
    }

    /// Install a fitted political-probability model, or `None` for the logistic fallback.
    pub fn set_political_model(&mut self, model: Option<FittedModel>) {
        self.selection.political = match model {
            Some(m) => PoliticalModel::Fitted(m),
            None => PoliticalModel::Fallback(self.fallback),
        };
    }

    /// Install a fitted topic-weight model, or `None` for absolute-extremity weighting.
    pub fn set_topic_model(&mut self, model: Option<FittedModel>) {
        self.selection.topic = match model {
            Some(m) => TopicModel::Fitted(m),
            None => TopicModel::AbsoluteExtremity,
        };
    }

    pub fn histograms(&self) -> &HistogramSet {
        &self.histograms
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn population(&self) -> &PopulationParams {
        &self.population
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn scaling(&self) -> Scaling {
        self.scaling
    }

    pub fn static_users(&self) -> usize {
        self.static_users
    }
}
