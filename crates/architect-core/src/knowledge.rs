//! Canned answers for the studio FAQ.
//!
//! Matching is plain substring containment on the lower-cased question: the
//! first entry (in table order) with any keyword found inside the input wins.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
    pub keywords: Vec<String>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("entry '{0}' has no keywords")]
    NoKeywords(String),

    #[error("entry '{0}' has an empty keyword")]
    EmptyKeyword(String),

    #[error("entry '{question}' has keyword '{keyword}' that is not lower-case")]
    NotLowercase { question: String, keyword: String },
}

/// (question, answer, keywords) rows of the studio FAQ, in match priority order.
const STUDIO_FAQ: &[(&str, &str, &[&str])] = &[
    (
        "Какие услуги вы предлагаете?",
        "Мы предлагаем полный спектр архитектурных услуг: проектирование жилых и коммерческих зданий, дизайн интерьеров, ландшафтный дизайн, авторский надзор и реконструкция.",
        &["услуги", "предлагаете", "чем занимаетесь", "услуга"],
    ),
    (
        "Сколько стоит проект?",
        "Стоимость проекта рассчитывается индивидуально в зависимости от площади, сложности и сроков. Базовый проект дома начинается от 1500 руб/м². Оставьте заявку для точного расчета.",
        &["цена", "стоит", "стоимость", "сколько", "ценa"],
    ),
    (
        "Как долго длится проектирование?",
        "Средний срок разработки архитектурного проекта — от 2 до 6 месяцев в зависимости от сложности объекта. Эскизный проект готовится за 2-3 недели.",
        &["срок", "долго", "время", "когда", "сроки"],
    ),
    (
        "Работаете ли вы по всей России?",
        "Да, мы работаем по всей территории России и СНГ. Для удаленных проектов используем видеоконференции и выезд на объект при необходимости.",
        &["регион", "город", "россия", "где", "место"],
    ),
];

/// Immutable FAQ table, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Build a table, checking that every keyword is non-empty and lower-case.
    pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self, KnowledgeError> {
        for entry in &entries {
            if entry.keywords.is_empty() {
                return Err(KnowledgeError::NoKeywords(entry.question.clone()));
            }
            for keyword in &entry.keywords {
                if keyword.is_empty() {
                    return Err(KnowledgeError::EmptyKeyword(entry.question.clone()));
                }
                if *keyword != keyword.to_lowercase() {
                    return Err(KnowledgeError::NotLowercase {
                        question: entry.question.clone(),
                        keyword: keyword.clone(),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    /// The studio FAQ shipped with the site.
    pub fn studio_faq() -> Result<Self, KnowledgeError> {
        let entries = STUDIO_FAQ
            .iter()
            .map(|(question, answer, keywords)| KnowledgeEntry {
                question: question.to_string(),
                answer: answer.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect();
        Self::new(entries)
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Answer of the first entry whose keyword occurs in `input`, if any.
    pub fn resolve(&self, input: &str) -> Option<&str> {
        if input.trim().is_empty() {
            return None;
        }

        let normalized = input.to_lowercase();
        let hit = self.entries.iter().find(|entry| {
            entry
                .keywords
                .iter()
                .any(|keyword| normalized.contains(keyword.as_str()))
        })?;

        debug!(question = %hit.question, "faq match");
        Some(hit.answer.as_str())
    }
}
