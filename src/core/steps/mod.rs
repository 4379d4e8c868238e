//! 精靈的各個表單步驟
//!
//! 每個表單都遵循相同的流程：
//! 1. 收集答案（互動提示只詢問目前可見的欄位，或直接從答案檔反序列化）
//! 2. `apply_visibility` 清除被隱藏欄位的答案，隱藏的欄位永遠不會送出
//! 3. `validate` 收集所有欄位錯誤
//! 4. `into_partial` 套用衍生規則，產生此步驟對預測請求的貢獻

pub mod appliances;
pub mod home;
pub mod household;
pub mod hvac;

pub use appliances::ApplianceForm;
pub use home::HomeForm;
pub use household::HouseholdForm;
pub use hvac::HvacForm;

use crate::domain::model::FieldError;
use crate::domain::request::PredictRequest;
use crate::utils::error::{ForecastError, Result};
use std::fmt::Display;

/// 最底層的提示介面；實作可以是終端機互動或測試用的腳本
pub trait Prompter {
    /// 從選項中擇一，回傳索引
    fn select(&mut self, prompt: &str, options: &[String], default: Option<usize>) -> Result<usize>;

    /// 整數輸入；空白代表未作答
    fn number(&mut self, prompt: &str, min: Option<i64>, max: Option<i64>) -> Result<Option<i64>>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    fn text(&mut self, prompt: &str) -> Result<String>;
}

pub trait StepForm: Sized {
    const NAME: &'static str;

    /// 清除隱藏欄位的答案，回傳被丟棄的欄位名稱
    fn apply_visibility(&mut self) -> Vec<&'static str>;

    fn validate(&self) -> Vec<FieldError>;

    fn collect(prompter: &mut dyn Prompter) -> Result<Self>;

    fn into_partial(self) -> PredictRequest;

    /// 可見性 → 驗證 → 衍生
    fn submit(mut self) -> Result<PredictRequest> {
        let dropped = self.apply_visibility();
        if !dropped.is_empty() {
            tracing::debug!("🙈 {}: ignoring hidden answers {:?}", Self::NAME, dropped);
        }

        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ForecastError::ValidationError {
                step: Self::NAME.to_string(),
                errors,
            });
        }

        let partial = self.into_partial();
        tracing::debug!(
            "📝 {}: contributed {} fields",
            Self::NAME,
            partial.field_count()
        );
        Ok(partial)
    }
}

/// 隱藏欄位時清空答案並記錄名稱
pub(crate) fn hide<T>(field: &mut Option<T>, name: &'static str, dropped: &mut Vec<&'static str>) {
    if field.take().is_some() {
        dropped.push(name);
    }
}

/// 可見的整數欄位：空白視為 0
pub(crate) fn count_or_zero(visible: bool, value: Option<i64>) -> Option<u32> {
    visible.then(|| to_count(value.unwrap_or(0)))
}

/// 可見的勾選框：未勾選視為 false
pub(crate) fn checkbox(visible: bool, value: Option<bool>) -> Option<bool> {
    visible.then(|| value.unwrap_or(false))
}

pub(crate) fn to_count(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

pub(crate) fn choose<T: Copy + Display + PartialEq>(
    prompter: &mut dyn Prompter,
    prompt: &str,
    options: &[T],
) -> Result<T> {
    let labels: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    let index = prompter.select(prompt, &labels, None)?;
    options
        .get(index)
        .copied()
        .ok_or_else(|| ForecastError::PromptError {
            message: format!("selection {} out of range for '{}'", index, prompt),
        })
}

/// 非必填的選項：第一個選項是「略過」
pub(crate) fn choose_optional<T: Copy + Display + PartialEq>(
    prompter: &mut dyn Prompter,
    prompt: &str,
    options: &[T],
) -> Result<Option<T>> {
    let mut labels = vec!["Skip".to_string()];
    labels.extend(options.iter().map(|o| o.to_string()));
    let index = prompter.select(prompt, &labels, Some(0))?;
    if index == 0 {
        return Ok(None);
    }
    options
        .get(index - 1)
        .copied()
        .map(Some)
        .ok_or_else(|| ForecastError::PromptError {
            message: format!("selection {} out of range for '{}'", index, prompt),
        })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Prompter;
    use crate::utils::error::{ForecastError, Result};
    use std::collections::VecDeque;

    /// 依序回放預先準備好的答案，並記錄被問過的問題
    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<String>,
        pub asked: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                asked: Vec::new(),
            }
        }

        fn next(&mut self, prompt: &str) -> Result<String> {
            self.asked.push(prompt.to_string());
            self.answers.pop_front().ok_or_else(|| ForecastError::PromptError {
                message: format!("no scripted answer for '{}'", prompt),
            })
        }

        pub fn remaining(&self) -> usize {
            self.answers.len()
        }
    }

    impl Prompter for ScriptedPrompter {
        fn select(&mut self, prompt: &str, options: &[String], _default: Option<usize>) -> Result<usize> {
            let answer = self.next(prompt)?;
            options
                .iter()
                .position(|o| *o == answer)
                .ok_or_else(|| ForecastError::PromptError {
                    message: format!("'{}' is not an option for '{}'", answer, prompt),
                })
        }

        fn number(&mut self, prompt: &str, _min: Option<i64>, _max: Option<i64>) -> Result<Option<i64>> {
            let answer = self.next(prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            answer.parse().map(Some).map_err(|_| ForecastError::PromptError {
                message: format!("'{}' is not a number", answer),
            })
        }

        fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
            Ok(self.next(prompt)? == "y")
        }

        fn text(&mut self, prompt: &str) -> Result<String> {
            self.next(prompt)
        }
    }
}
