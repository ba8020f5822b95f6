// 📝 Presentation state - form drafts and the edit flow
//
// The dashboard owns one `Session`. It holds whatever the user is typing and
// which dialog is open. Drafts only reach the tracker through `submit`,
// and an invalid draft stays open with its input intact.

use chrono::NaiveDate;

use crate::entities::{parse_amount, Category, Expense, NewExpense};
use crate::error::{TrackerError, ValidationError};
use crate::store::KeyValueStore;
use crate::temporal::{format_date, parse_date};
use crate::tracker::{DeleteRequest, Tracker};

// ============================================================================
// EXPENSE FORM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Description,
    Amount,
    Category,
    Date,
}

impl FormField {
    pub const ORDER: [FormField; 4] = [
        FormField::Description,
        FormField::Amount,
        FormField::Category,
        FormField::Date,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Description => "Description",
            FormField::Amount => "Amount",
            FormField::Category => "Category",
            FormField::Date => "Date",
        }
    }

    fn index(&self) -> usize {
        FormField::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        FormField::ORDER[(self.index() + 1) % FormField::ORDER.len()]
    }

    pub fn previous(&self) -> Self {
        let len = FormField::ORDER.len();
        FormField::ORDER[(self.index() + len - 1) % len]
    }
}

/// Text draft of an expense. Numbers and dates stay as typed until `parse`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub description: String,
    pub amount: String,
    pub category: Category,
    pub date: String,
    pub focus: FormField,
}

impl ExpenseForm {
    /// Blank form dated today
    pub fn new(today: NaiveDate) -> Self {
        ExpenseForm {
            description: String::new(),
            amount: String::new(),
            category: Category::default(),
            date: format_date(today),
            focus: FormField::Description,
        }
    }

    /// Draft populated from an existing record
    pub fn from_expense(expense: &Expense) -> Self {
        ExpenseForm {
            description: expense.description.clone(),
            amount: expense.amount.to_string(),
            category: expense.category,
            date: format_date(expense.date),
            focus: FormField::Description,
        }
    }

    pub fn parse(&self) -> Result<NewExpense, ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let amount = parse_amount(&self.amount)?;
        let date = parse_date(&self.date)?;

        NewExpense::new(&self.description, amount, self.category, date)
    }

    /// Keep category and date for the next entry
    pub fn clear_after_add(&mut self) {
        self.description.clear();
        self.amount.clear();
        self.focus = FormField::Description;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn input(&mut self, c: char) {
        match self.focus {
            FormField::Description => self.description.push(c),
            FormField::Amount => {
                if c.is_ascii_digit() || matches!(c, '.' | ',' | '$') {
                    self.amount.push(c);
                }
            }
            FormField::Date => {
                if c.is_ascii_digit() || c == '-' {
                    self.date.push(c);
                }
            }
            FormField::Category => match c {
                ' ' | 'l' => self.category = self.category.next(),
                'h' => self.category = self.category.previous(),
                _ => {}
            },
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Description => {
                self.description.pop();
            }
            FormField::Amount => {
                self.amount.pop();
            }
            FormField::Date => {
                self.date.pop();
            }
            FormField::Category => {}
        }
    }

    pub fn cycle_category(&mut self, forward: bool) {
        self.category = if forward {
            self.category.next()
        } else {
            self.category.previous()
        };
    }

    /// Displayed value of a field
    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Description => self.description.clone(),
            FormField::Amount => self.amount.clone(),
            FormField::Category => format!("{} {}", self.category.icon(), self.category.name()),
            FormField::Date => self.date.clone(),
        }
    }
}

// ============================================================================
// INCOME FORM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncomeForm {
    pub input: String,
}

impl IncomeForm {
    /// Prefilled with the current income, blank when it is zero
    pub fn new(current: f64) -> Self {
        let input = if current > 0.0 {
            current.to_string()
        } else {
            String::new()
        };
        IncomeForm { input }
    }

    pub fn parse(&self) -> Result<f64, ValidationError> {
        let cleaned: String = self
            .input
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();

        match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
            _ => Err(ValidationError::InvalidIncome(self.input.trim().to_string())),
        }
    }

    pub fn input(&mut self, c: char) {
        if c.is_ascii_digit() || matches!(c, '.' | ',' | '$') {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }
}

// ============================================================================
// SESSION / EDIT FLOW
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub id: i64,
    pub form: ExpenseForm,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Idle,
    AddingExpense(ExpenseForm),
    SettingIncome(IncomeForm),
    Editing(EditSession),
    ConfirmDelete(DeleteRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

/// What a submit did, so the caller knows whether to re-derive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Rejected,
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub mode: Mode,
    pub status: Option<Status>,
    /// Add-form draft kept between openings so category/date carry over
    last_add_form: Option<ExpenseForm>,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            mode: Mode::Idle,
            status: None,
            last_add_form: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    pub fn begin_add(&mut self, today: NaiveDate) {
        let form = self
            .last_add_form
            .clone()
            .unwrap_or_else(|| ExpenseForm::new(today));
        self.mode = Mode::AddingExpense(form);
    }

    pub fn begin_income(&mut self, current: f64) {
        self.mode = Mode::SettingIncome(IncomeForm::new(current));
    }

    /// Open the editor on `expense`, replacing any draft already open
    pub fn begin_edit(&mut self, expense: &Expense) {
        self.mode = Mode::Editing(EditSession {
            id: expense.id,
            form: ExpenseForm::from_expense(expense),
        });
    }

    /// Ask for confirmation before deleting `id`
    pub fn begin_delete<S: KeyValueStore>(&mut self, tracker: &Tracker<S>, id: i64) {
        if let Some(request) = tracker.request_delete(id) {
            self.mode = Mode::ConfirmDelete(request);
        }
    }

    /// Close any dialog without touching the tracker
    pub fn cancel(&mut self) {
        if let Mode::AddingExpense(form) = &self.mode {
            self.last_add_form = Some(form.clone());
        }
        self.mode = Mode::Idle;
    }

    pub fn expense_form_mut(&mut self) -> Option<&mut ExpenseForm> {
        match &mut self.mode {
            Mode::AddingExpense(form) => Some(form),
            Mode::Editing(session) => Some(&mut session.form),
            _ => None,
        }
    }

    pub fn income_form_mut(&mut self) -> Option<&mut IncomeForm> {
        match &mut self.mode {
            Mode::SettingIncome(form) => Some(form),
            _ => None,
        }
    }

    /// Apply the open form to the tracker
    pub fn submit<S: KeyValueStore>(&mut self, tracker: &mut Tracker<S>) -> Outcome {
        let mode = std::mem::replace(&mut self.mode, Mode::Idle);

        match mode {
            Mode::Idle => Outcome::Unchanged,
            Mode::AddingExpense(mut form) => match form.parse() {
                Ok(new) => {
                    let description = new.description.clone();
                    match tracker.add_expense(new) {
                        Ok(_) => {
                            form.clear_after_add();
                            self.last_add_form = Some(form);
                            self.info(format!("Added \"{}\"", description));
                            Outcome::Changed
                        }
                        Err(e) => self.keep_open(Mode::AddingExpense(form), e),
                    }
                }
                Err(e) => self.keep_open(Mode::AddingExpense(form), e.into()),
            },
            Mode::SettingIncome(form) => match form.parse() {
                Ok(income) => match tracker.set_income(income) {
                    Ok(()) => {
                        self.info(format!("Income set to {}", format_money(income)));
                        Outcome::Changed
                    }
                    Err(e) => self.keep_open(Mode::SettingIncome(form), e),
                },
                Err(e) => self.keep_open(Mode::SettingIncome(form), e.into()),
            },
            Mode::Editing(edit) => match edit.form.parse() {
                Ok(new) => match tracker.update_expense(new.with_id(edit.id)) {
                    Ok(true) => {
                        self.info("Expense updated".to_string());
                        Outcome::Changed
                    }
                    Ok(false) => {
                        self.error("Expense no longer exists".to_string());
                        Outcome::Unchanged
                    }
                    Err(e) => self.keep_open(Mode::Editing(edit), e),
                },
                Err(e) => self.keep_open(Mode::Editing(edit), e.into()),
            },
            Mode::ConfirmDelete(request) => self.confirm_delete(tracker, request),
        }
    }

    fn confirm_delete<S: KeyValueStore>(
        &mut self,
        tracker: &mut Tracker<S>,
        request: DeleteRequest,
    ) -> Outcome {
        match tracker.delete_expense(request) {
            Ok(Some(removed)) => {
                self.info(format!("Deleted \"{}\"", removed.description));
                Outcome::Changed
            }
            Ok(None) => Outcome::Unchanged,
            Err(e) => {
                self.error(e.to_string());
                Outcome::Rejected
            }
        }
    }

    fn keep_open(&mut self, mode: Mode, error: TrackerError) -> Outcome {
        tracing::debug!(%error, "submission rejected");
        self.mode = mode;
        self.error(error.to_string());
        Outcome::Rejected
    }

    fn info(&mut self, text: String) {
        self.status = Some(Status {
            kind: StatusKind::Info,
            text,
        });
    }

    fn error(&mut self, text: String) {
        self.status = Some(Status {
            kind: StatusKind::Error,
            text,
        });
    }
}

/// `$1,234.50` / `-$20.00`
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn type_text(form: &mut ExpenseForm, text: &str) {
        for c in text.chars() {
            form.input(c);
        }
    }

    fn filled_form(description: &str, amount: &str) -> ExpenseForm {
        let mut form = ExpenseForm::new(today());
        type_text(&mut form, description);
        form.focus_next();
        type_text(&mut form, amount);
        form
    }

    #[test]
    fn test_new_form_defaults() {
        let form = ExpenseForm::new(today());
        assert_eq!(form.date, "2026-10-19");
        assert_eq!(form.category, Category::Food);
        assert_eq!(form.focus, FormField::Description);
    }

    #[test]
    fn test_form_field_filters() {
        let mut form = ExpenseForm::new(today());
        form.focus = FormField::Amount;
        type_text(&mut form, "1a2.5x");
        assert_eq!(form.amount, "12.5");

        form.focus = FormField::Category;
        form.input(' ');
        assert_eq!(form.category, Category::Transport);
        form.cycle_category(false);
        assert_eq!(form.category, Category::Food);

        form.focus_previous();
        assert_eq!(form.focus, FormField::Amount);
        form.backspace();
        assert_eq!(form.amount, "12.");
    }

    #[test]
    fn test_add_with_invalid_input_leaves_list_unchanged() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let mut session = Session::new();

        for (description, amount) in [("Coffee", "0"), ("", "4.50"), ("Coffee", "")] {
            session.mode = Mode::AddingExpense(filled_form(description, amount));
            let before = tracker.expenses().to_vec();

            assert_eq!(session.submit(&mut tracker), Outcome::Rejected);
            assert_eq!(tracker.expenses(), before.as_slice());
            assert_eq!(session.status.as_ref().unwrap().kind, StatusKind::Error);

            // Form stays open with the typed input
            match &session.mode {
                Mode::AddingExpense(form) => assert_eq!(form.description, description),
                other => panic!("expected add form to stay open, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_add_missing_date_rejected() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let mut session = Session::new();
        let mut form = filled_form("Book", "12");
        form.date.clear();
        session.mode = Mode::AddingExpense(form);

        assert_eq!(session.submit(&mut tracker), Outcome::Rejected);
        assert!(tracker.expenses().is_empty());
    }

    #[test]
    fn test_add_success_clears_description_and_amount() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let mut session = Session::new();
        session.begin_add(today());
        if let Some(form) = session.expense_form_mut() {
            type_text(form, "Train");
            form.focus_next();
            type_text(form, "8.20");
            form.focus_next();
            form.cycle_category(true);
        }

        assert_eq!(session.submit(&mut tracker), Outcome::Changed);
        assert!(session.is_idle());
        assert_eq!(tracker.expenses().len(), 1);
        assert_eq!(tracker.expenses()[0].category, Category::Transport);

        // Reopening keeps category and date, clears the rest
        session.begin_add(today());
        match &session.mode {
            Mode::AddingExpense(form) => {
                assert!(form.description.is_empty());
                assert!(form.amount.is_empty());
                assert_eq!(form.category, Category::Transport);
                assert_eq!(form.date, "2026-10-19");
            }
            other => panic!("expected add form, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_flow_idle_editing_idle() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let id = tracker
            .add_expense(NewExpense::new("Pizza", 18.0, Category::Food, today()).unwrap())
            .unwrap();
        let mut session = Session::new();
        assert!(session.is_idle());

        let expense = tracker.get(id).unwrap().clone();
        session.begin_edit(&expense);
        if let Some(form) = session.expense_form_mut() {
            form.focus = FormField::Amount;
            form.amount = "21.5".to_string();
        }

        assert_eq!(session.submit(&mut tracker), Outcome::Changed);
        assert!(session.is_idle());
        assert_eq!(tracker.get(id).unwrap().amount, 21.5);
        assert_eq!(tracker.get(id).unwrap().description, "Pizza");
    }

    #[test]
    fn test_edit_cancel_discards_draft() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let id = tracker
            .add_expense(NewExpense::new("Gym", 40.0, Category::Health, today()).unwrap())
            .unwrap();
        let mut session = Session::new();

        session.begin_edit(&tracker.get(id).unwrap().clone());
        if let Some(form) = session.expense_form_mut() {
            form.description = "Changed".to_string();
        }
        session.cancel();

        assert!(session.is_idle());
        assert_eq!(tracker.get(id).unwrap().description, "Gym");
        assert_eq!(session.submit(&mut tracker), Outcome::Unchanged);
    }

    #[test]
    fn test_selecting_another_expense_replaces_draft() {
        let first = NewExpense::new("A", 1.0, Category::Food, today())
            .unwrap()
            .with_id(1);
        let second = NewExpense::new("B", 2.0, Category::Shopping, today())
            .unwrap()
            .with_id(2);
        let mut session = Session::new();

        session.begin_edit(&first);
        if let Some(form) = session.expense_form_mut() {
            form.description.push_str(" draft");
        }
        session.begin_edit(&second);

        match &session.mode {
            Mode::Editing(edit) => {
                assert_eq!(edit.id, 2);
                assert_eq!(edit.form.description, "B");
                assert_eq!(edit.form.category, Category::Shopping);
            }
            other => panic!("expected editing, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_edit_keeps_modal_open() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let cinema = NewExpense::new("Cinema", 12.0, Category::Entertainment, today()).unwrap();
        let id = tracker.add_expense(cinema).unwrap();
        let mut session = Session::new();
        session.begin_edit(&tracker.get(id).unwrap().clone());
        if let Some(form) = session.expense_form_mut() {
            form.amount = "0".to_string();
        }

        assert_eq!(session.submit(&mut tracker), Outcome::Rejected);
        assert!(matches!(session.mode, Mode::Editing(_)));
        assert_eq!(tracker.get(id).unwrap().amount, 12.0);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let id = tracker
            .add_expense(NewExpense::new("Lamp", 30.0, Category::Shopping, today()).unwrap())
            .unwrap();
        let mut session = Session::new();

        // Declining keeps the record
        session.begin_delete(&tracker, id);
        assert!(matches!(session.mode, Mode::ConfirmDelete(_)));
        session.cancel();
        assert_eq!(tracker.expenses().len(), 1);

        session.begin_delete(&tracker, id);
        assert_eq!(session.submit(&mut tracker), Outcome::Changed);
        assert!(tracker.expenses().is_empty());
        assert!(session.is_idle());
    }

    #[test]
    fn test_income_form() {
        assert_eq!(IncomeForm::new(0.0).input, "");
        assert_eq!(IncomeForm::new(3000.0).input, "3000");

        let mut tracker = Tracker::load(MemoryStore::new());
        let mut session = Session::new();

        session.begin_income(tracker.income());
        if let Some(form) = session.income_form_mut() {
            for c in "2,500.75".chars() {
                form.input(c);
            }
        }
        assert_eq!(session.submit(&mut tracker), Outcome::Changed);
        assert_eq!(tracker.income(), 2500.75);

        session.mode = Mode::SettingIncome(IncomeForm {
            input: "-4".to_string(),
        });
        assert_eq!(session.submit(&mut tracker), Outcome::Rejected);
        assert_eq!(tracker.income(), 2500.75);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(77.5), "$77.50");
        assert_eq!(format_money(2922.5), "$2,922.50");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(-20.0), "-$20.00");
    }
}
