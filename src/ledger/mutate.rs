//! Insert, update and delete. Each function leaves its input untouched and returns the new list;
//! persisting that list is the caller's job.

use crate::model::{Expense, ExpenseFields, ExpenseId, Expenses, ValidationError};

/// Appends `record` to the list.
///
/// # Errors
/// Returns a `ValidationError` if a field is invalid, the identifier is unassigned, or another
/// record already uses the identifier. In that case no new list is produced.
pub fn insert(list: &Expenses, record: Expense) -> Result<Expenses, ValidationError> {
    record.validate()?;
    if list.contains(record.id()) {
        return Err(ValidationError::DuplicateId(record.id()));
    }
    let mut next = list.clone();
    next.push(record);
    Ok(next)
}

/// Removes the record with identifier `id`. An absent `id` returns an identical list.
pub fn delete_by_id(list: &Expenses, id: ExpenseId) -> Expenses {
    let mut next = list.clone();
    next.retain(|e| e.id() != id);
    next
}

/// Replaces every field of the record with identifier `id`, keeping its position and identifier.
/// An absent `id` returns an identical list.
///
/// # Errors
/// Returns a `ValidationError` if `patch` is invalid, whether or not `id` exists.
pub fn update_by_id(
    list: &Expenses,
    id: ExpenseId,
    patch: ExpenseFields,
) -> Result<Expenses, ValidationError> {
    patch.validate()?;
    let mut next = list.clone();
    if let Some(expense) = next.get_mut(id) {
        expense.replace_fields(patch);
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::{expense, fields};
    use crate::model::Amount;
    use std::str::FromStr;

    fn sample() -> Expenses {
        Expenses::new(vec![
            expense(1, "Groceries", "100", "Food", "2025-03-01"),
            expense(2, "Bus pass", "50", "Transport", "2025-03-02"),
        ])
    }

    #[test]
    fn test_insert_valid_record() {
        let list = sample();
        let record = expense(3, "Pizza", "25", "Food", "2025-03-03");
        let next = insert(&list, record.clone()).unwrap();
        assert_eq!(next.len(), list.len() + 1);
        assert_eq!(next.get(ExpenseId::new(3)), Some(&record));
        assert_eq!(next.data().last(), Some(&record));
    }

    #[test]
    fn test_insert_negative_amount_is_rejected() {
        let list = sample();
        let mut f = fields("Refund", "1", "Food", "2025-03-03");
        f.amount = Amount::from_str("-5").unwrap();
        let record = Expense::new(ExpenseId::new(3), f);
        let err = insert(&list, record).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount(_)));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_insert_empty_name_is_rejected() {
        let mut f = fields("x", "1", "Food", "2025-03-03");
        f.name = String::new();
        let record = Expense::new(ExpenseId::new(3), f);
        assert_eq!(
            insert(&sample(), record),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn test_insert_duplicate_id_is_rejected() {
        let record = expense(2, "Taxi", "30", "Transport", "2025-03-03");
        assert_eq!(
            insert(&sample(), record),
            Err(ValidationError::DuplicateId(ExpenseId::new(2)))
        );
    }

    #[test]
    fn test_insert_unassigned_id_is_rejected() {
        let record = expense(0, "Taxi", "30", "Transport", "2025-03-03");
        assert_eq!(
            insert(&sample(), record),
            Err(ValidationError::UnassignedId)
        );
    }

    #[test]
    fn test_delete_existing() {
        let list = sample();
        let next = delete_by_id(&list, ExpenseId::new(1));
        assert_eq!(next.len(), list.len() - 1);
        assert!(!next.contains(ExpenseId::new(1)));
        assert!(next.contains(ExpenseId::new(2)));
    }

    #[test]
    fn test_delete_missing_is_a_no_op() {
        let list = sample();
        let next = delete_by_id(&list, ExpenseId::new(99));
        assert_eq!(next, list);
        let again = delete_by_id(&next, ExpenseId::new(99));
        assert_eq!(again, list);
    }

    #[test]
    fn test_update_replaces_fields_in_place() {
        let list = sample();
        let patch = fields("Train", "75.5", "Transport", "2025-03-09");
        let next = update_by_id(&list, ExpenseId::new(1), patch.clone()).unwrap();
        assert_eq!(next.len(), 2);
        let updated = &next.data()[0];
        assert_eq!(updated.id(), ExpenseId::new(1));
        assert_eq!(updated.fields(), patch);
        assert_eq!(next.data()[1], list.data()[1]);
    }

    #[test]
    fn test_update_missing_is_a_no_op() {
        let list = sample();
        let patch = fields("Train", "75.5", "Transport", "2025-03-09");
        let next = update_by_id(&list, ExpenseId::new(42), patch).unwrap();
        assert_eq!(next, list);
    }

    #[test]
    fn test_update_with_invalid_patch_is_rejected() {
        let mut patch = fields("Train", "1", "Transport", "2025-03-09");
        patch.category = " ".into();
        assert_eq!(
            update_by_id(&sample(), ExpenseId::new(1), patch),
            Err(ValidationError::EmptyCategory)
        );
    }
}
