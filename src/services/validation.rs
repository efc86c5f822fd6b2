//! Turns client payloads into validated write models. Every failure is an
//! `AppError::Validation` carrying a translated message.

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::calendar::time_range::{parse_clock, DayOfWeek};
use crate::db::models::{
    CreateProfessor, InventoryInput, NewInventoryItem, NewSchedule, NewShift, ReviewInput,
    ScheduleInput, ShiftInput, ShiftStatus, UpdateProfessor, UpsertClassReview,
};
use crate::error::{AppError, AppResult};
use crate::i18n::{t, t_with};

fn invalid(key: &str) -> AppError {
    AppError::Validation(t(key))
}

/// Trimmed value, or `None` when absent or blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `YYYY-MM-DD` within years 1900 to 9999.
pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .filter(|d| (1900..=9999).contains(&d.year()))
        .ok_or_else(|| AppError::Validation(t_with("validation.invalid_date", &[("date", raw)])))
}

pub fn parse_time(raw: &str) -> AppResult<NaiveTime> {
    parse_clock(raw)
        .ok_or_else(|| AppError::Validation(t_with("validation.invalid_time", &[("time", raw)])))
}

pub fn parse_day(raw: &str) -> AppResult<DayOfWeek> {
    DayOfWeek::from_str(raw)
        .ok_or_else(|| AppError::Validation(t_with("validation.invalid_day", &[("day", raw)])))
}

pub fn professor(input: CreateProfessor) -> AppResult<CreateProfessor> {
    let full_name = input.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(invalid("validation.professor_name_required"));
    }
    Ok(CreateProfessor {
        full_name,
        email: non_blank(input.email),
        specialty: non_blank(input.specialty),
        status: non_blank(input.status),
    })
}

/// A present-but-blank name is rejected; an absent one is left unchanged.
pub fn professor_update(input: UpdateProfessor) -> AppResult<UpdateProfessor> {
    let full_name = match input.full_name {
        Some(name) if name.trim().is_empty() => {
            return Err(invalid("validation.professor_name_required"))
        }
        Some(name) => Some(name.trim().to_string()),
        None => None,
    };
    Ok(UpdateProfessor {
        full_name,
        email: input.email.map(|v| v.trim().to_string()),
        specialty: input.specialty.map(|v| v.trim().to_string()),
        status: non_blank(input.status),
    })
}

pub fn schedule(input: ScheduleInput) -> AppResult<NewSchedule> {
    let (Some(professor_id), Some(day), Some(sport), Some(start), Some(end)) = (
        non_blank(input.professor_id),
        non_blank(input.day_of_week),
        non_blank(input.sport),
        non_blank(input.start_time),
        non_blank(input.end_time),
    ) else {
        return Err(invalid("validation.schedule_fields_required"));
    };

    let start_time = parse_time(&start)?;
    let end_time = parse_time(&end)?;
    if end_time <= start_time {
        return Err(invalid("validation.end_after_start"));
    }

    Ok(NewSchedule {
        professor_id,
        day_of_week: parse_day(&day)?,
        sport,
        start_time,
        end_time,
        description: non_blank(input.description),
        court_id: non_blank(input.court_id),
    })
}

pub fn shift(input: ShiftInput) -> AppResult<NewShift> {
    let (Some(date), Some(start), Some(end)) = (
        non_blank(input.date),
        non_blank(input.start_time),
        non_blank(input.end_time),
    ) else {
        return Err(invalid("validation.shift_fields_required"));
    };

    let start_time = parse_time(&start)?;
    let end_time = parse_time(&end)?;
    if end_time <= start_time {
        return Err(invalid("validation.end_after_start"));
    }

    let status = match non_blank(input.status) {
        Some(raw) => ShiftStatus::from_str(&raw).ok_or_else(|| {
            AppError::Validation(t_with("validation.invalid_status", &[("status", raw.as_str())]))
        })?,
        None => ShiftStatus::Scheduled,
    };

    Ok(NewShift {
        date: parse_date(&date)?,
        start_time,
        end_time,
        court_id: non_blank(input.court_id),
        professor_id: non_blank(input.professor_id),
        group_name: non_blank(input.group_name),
        status,
        price: input.price,
    })
}

pub fn review(input: ReviewInput) -> AppResult<UpsertClassReview> {
    let (Some(schedule_id), Some(date)) = (non_blank(input.schedule_id), non_blank(input.date))
    else {
        return Err(invalid("validation.report_fields_required"));
    };
    if input.attendance.is_some_and(|a| a < 0) {
        return Err(invalid("validation.attendance_negative"));
    }

    Ok(UpsertClassReview {
        schedule_id,
        date: parse_date(&date)?,
        attendance: input.attendance,
        notes: non_blank(input.notes),
    })
}

/// Whole, non-negative quantity from a JSON number or numeric string.
fn quantity(value: Option<&serde_json::Value>) -> AppResult<i64> {
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let quantity = parsed.ok_or_else(|| invalid("validation.inventory_required"))?;
    if quantity < 0 {
        return Err(invalid("validation.quantity_negative"));
    }
    Ok(quantity)
}

pub fn inventory_item(input: InventoryInput) -> AppResult<NewInventoryItem> {
    let name = non_blank(input.name).ok_or_else(|| invalid("validation.inventory_required"))?;
    Ok(NewInventoryItem {
        name,
        quantity: quantity(input.quantity.as_ref())?,
        description: non_blank(input.description),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    fn schedule_input(day: &str, start: &str, end: &str) -> ScheduleInput {
        ScheduleInput {
            professor_id: Some("p1".to_string()),
            day_of_week: Some(day.to_string()),
            sport: Some(" Voley ".to_string()),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            description: Some("   ".to_string()),
            court_id: None,
        }
    }

    #[test]
    fn schedule_normalises_day_and_trims() {
        let s = schedule(schedule_input("miercoles", "18:00", "19:30")).unwrap();
        assert_eq!(s.day_of_week, DayOfWeek::Miercoles);
        assert_eq!(s.sport, "Voley");
        assert!(s.description.is_none());
    }

    #[test]
    fn schedule_requires_end_after_start() {
        for (start, end) in [("10:00", "10:00"), ("19:00", "18:00"), ("22:00", "02:00")] {
            assert_eq!(
                message(schedule(schedule_input("Lunes", start, end)).unwrap_err()),
                "La hora de fin debe ser posterior a la hora de inicio",
                "{}-{}",
                start,
                end
            );
        }
    }

    #[test]
    fn dates_outside_supported_years_are_rejected() {
        assert!(parse_date("+262142-12-31").is_err());
        assert!(parse_date("1899-12-31").is_err());
        assert_eq!(
            parse_date(" 2024-03-04 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    #[test]
    fn schedule_rejects_missing_and_malformed_fields() {
        let mut missing = schedule_input("Lunes", "18:00", "19:00");
        missing.sport = None;
        assert_eq!(message(schedule(missing).unwrap_err()), "Todos los campos son requeridos");
        assert_eq!(
            message(schedule(schedule_input("Funday", "18:00", "19:00")).unwrap_err()),
            "Día de la semana inválido: Funday"
        );
        assert_eq!(
            message(schedule(schedule_input("Lunes", "6pm", "19:00")).unwrap_err()),
            "Horario inválido: 6pm"
        );
    }

    #[test]
    fn shift_requires_end_after_start() {
        let input = ShiftInput {
            date: Some("2024-03-04".to_string()),
            start_time: Some("11:00".to_string()),
            end_time: Some("10:00".to_string()),
            court_id: None,
            professor_id: None,
            group_name: None,
            status: None,
            price: None,
        };
        assert_eq!(
            message(shift(input.clone()).unwrap_err()),
            "La hora de fin debe ser posterior a la hora de inicio"
        );

        let ok = shift(ShiftInput {
            end_time: Some("12:00".to_string()),
            status: Some("cancelado".to_string()),
            ..input.clone()
        })
        .unwrap();
        assert_eq!(ok.status, ShiftStatus::Cancelled);

        assert!(shift(ShiftInput {
            end_time: Some("12:00".to_string()),
            status: Some("maybe".to_string()),
            ..input.clone()
        })
        .is_err());
        assert!(shift(ShiftInput {
            date: Some("04/03/2024".to_string()),
            end_time: Some("12:00".to_string()),
            ..input
        })
        .is_err());
    }

    #[test]
    fn review_rejects_negative_attendance() {
        let input = ReviewInput {
            schedule_id: Some("s1".to_string()),
            date: Some("2024-03-04".to_string()),
            attendance: Some(-1),
            notes: None,
        };
        assert_eq!(
            message(review(input.clone()).unwrap_err()),
            "La asistencia no puede ser negativa"
        );
        let ok = review(ReviewInput {
            attendance: Some(0),
            ..input
        })
        .unwrap();
        assert_eq!(ok.attendance, Some(0));
    }

    #[test]
    fn inventory_quantity_accepts_numeric_strings() {
        let item = inventory_item(InventoryInput {
            name: Some("Pelotas".to_string()),
            quantity: Some(json!("12")),
            description: None,
        })
        .unwrap();
        assert_eq!(item.quantity, 12);

        let negative = inventory_item(InventoryInput {
            name: Some("Pelotas".to_string()),
            quantity: Some(json!(-3)),
            description: None,
        });
        assert_eq!(message(negative.unwrap_err()), "La cantidad no puede ser negativa");

        let not_a_number = inventory_item(InventoryInput {
            name: Some("Pelotas".to_string()),
            quantity: Some(json!("muchas")),
            description: None,
        });
        assert_eq!(
            message(not_a_number.unwrap_err()),
            "Nombre y cantidad son requeridos"
        );
    }

    #[test]
    fn professor_name_is_required() {
        let input = CreateProfessor {
            full_name: "   ".to_string(),
            email: None,
            specialty: None,
            status: None,
        };
        assert_eq!(message(professor(input).unwrap_err()), "El nombre es requerido");

        let blank_update = UpdateProfessor {
            full_name: Some(String::new()),
            ..Default::default()
        };
        assert!(professor_update(blank_update).is_err());
        assert!(professor_update(UpdateProfessor::default()).is_ok());
    }
}
