//! User-facing strings. Spanish is what the club staff sees; English exists
//! for API consumers and must carry the same keys. Placeholders look like
//! `{sport}`.

use std::collections::HashMap;
use std::sync::OnceLock;

pub const DEFAULT_LANG: &str = "es";

static TRANSLATIONS: OnceLock<HashMap<String, HashMap<String, String>>> = OnceLock::new();

const ES_JSON: &str = r#"
{
  "labels.no_professor": "Sin profesor",
  "labels.no_court": "Sin cancha",
  "labels.class_of": "Clase de {sport}",
  "status.scheduled": "Programado",
  "status.completed": "Completado",
  "status.cancelled": "Cancelado",
  "workload.low": "Baja",
  "workload.medium": "Media",
  "workload.high": "Alta",
  "workload.very_high": "Muy Alta",
  "errors.unauthorized": "No autenticado",
  "errors.forbidden": "No autorizado",
  "errors.database": "Ocurrió un error en la base de datos",
  "errors.internal": "Error interno del servidor",
  "errors.invalid_token": "Sesión inválida o expirada",
  "errors.rate_limited": "Demasiados intentos, reintente en {seconds} s",
  "validation.professor_name_required": "El nombre es requerido",
  "validation.schedule_fields_required": "Todos los campos son requeridos",
  "validation.shift_fields_required": "Fecha, hora de inicio y hora de fin son requeridas",
  "validation.invalid_day": "Día de la semana inválido: {day}",
  "validation.invalid_time": "Horario inválido: {time}",
  "validation.invalid_date": "Fecha inválida: {date}",
  "validation.report_wrong_day": "La clase se dicta los {day}",
  "validation.invalid_view": "Vista inválida: {view}",
  "validation.invalid_status": "Estado inválido: {status}",
  "validation.end_after_start": "La hora de fin debe ser posterior a la hora de inicio",
  "validation.inventory_required": "Nombre y cantidad son requeridos",
  "validation.quantity_negative": "La cantidad no puede ser negativa",
  "validation.report_fields_required": "Faltan datos requeridos",
  "validation.attendance_negative": "La asistencia no puede ser negativa",
  "validation.credentials_required": "Email y contraseña son requeridos",
  "validation.password_too_short": "La nueva contraseña debe tener al menos 6 caracteres",
  "validation.password_mismatch": "Las contraseñas no coinciden",
  "validation.password_unchanged": "La nueva contraseña debe ser diferente a la actual",
  "validation.password_incorrect": "La contraseña actual es incorrecta",
  "validation.message_required": "Mensaje requerido",
  "auth.invalid_credentials": "Email o contraseña incorrectos",
  "auth.logged_out": "Sesión cerrada",
  "auth.password_updated": "Contraseña actualizada correctamente",
  "not_found.professor": "Profesor no encontrado",
  "not_found.schedule": "Horario no encontrado",
  "not_found.shift": "Turno no encontrado",
  "not_found.inventory_item": "Item de inventario no encontrado",
  "not_found.court": "Cancha no encontrada",
  "professor.deleted": "Profesor eliminado",
  "schedule.deleted": "Horario eliminado",
  "shift.deleted": "Turno eliminado",
  "inventory.deleted": "Item eliminado",
  "chat.assistant_unavailable": "El asistente no está configurado",
  "chat.assistant_error": "Error al comunicarse con el asistente",
  "chat.empty_reply": "No pude generar una respuesta.",
  "app.name": "Complejos Deportivos"
}
"#;

const EN_JSON: &str = r#"
{
  "labels.no_professor": "No professor",
  "labels.no_court": "No court",
  "labels.class_of": "{sport} class",
  "status.scheduled": "Scheduled",
  "status.completed": "Completed",
  "status.cancelled": "Cancelled",
  "workload.low": "Low",
  "workload.medium": "Medium",
  "workload.high": "High",
  "workload.very_high": "Very high",
  "errors.unauthorized": "Not authenticated",
  "errors.forbidden": "Not authorized",
  "errors.database": "A database error occurred",
  "errors.internal": "Internal server error",
  "errors.invalid_token": "Invalid or expired session",
  "errors.rate_limited": "Too many attempts, retry in {seconds} s",
  "validation.professor_name_required": "Name is required",
  "validation.schedule_fields_required": "All fields are required",
  "validation.shift_fields_required": "Date, start time and end time are required",
  "validation.invalid_day": "Invalid day of week: {day}",
  "validation.invalid_time": "Invalid time: {time}",
  "validation.invalid_date": "Invalid date: {date}",
  "validation.report_wrong_day": "This class is held on {day}",
  "validation.invalid_view": "Invalid view: {view}",
  "validation.invalid_status": "Invalid status: {status}",
  "validation.end_after_start": "End time must be after start time",
  "validation.inventory_required": "Name and quantity are required",
  "validation.quantity_negative": "Quantity cannot be negative",
  "validation.report_fields_required": "Missing required data",
  "validation.attendance_negative": "Attendance cannot be negative",
  "validation.credentials_required": "Email and password are required",
  "validation.password_too_short": "The new password must be at least 6 characters long",
  "validation.password_mismatch": "Passwords do not match",
  "validation.password_unchanged": "The new password must differ from the current one",
  "validation.password_incorrect": "The current password is incorrect",
  "validation.message_required": "Message is required",
  "auth.invalid_credentials": "Wrong email or password",
  "auth.logged_out": "Logged out",
  "auth.password_updated": "Password updated",
  "not_found.professor": "Professor not found",
  "not_found.schedule": "Schedule not found",
  "not_found.shift": "Shift not found",
  "not_found.inventory_item": "Inventory item not found",
  "not_found.court": "Court not found",
  "professor.deleted": "Professor deleted",
  "schedule.deleted": "Schedule deleted",
  "shift.deleted": "Shift deleted",
  "inventory.deleted": "Item deleted",
  "chat.assistant_unavailable": "The assistant is not configured",
  "chat.assistant_error": "Failed to reach the assistant",
  "chat.empty_reply": "I could not generate a reply.",
  "app.name": "Sports Complexes"
}
"#;

fn build_translations() -> HashMap<String, HashMap<String, String>> {
    [("es", ES_JSON), ("en", EN_JSON)]
        .into_iter()
        .map(|(lang, raw)| {
            let table: HashMap<String, String> = serde_json::from_str(raw)
                .unwrap_or_else(|e| panic!("embedded {} translations are not valid JSON: {}", lang, e));
            (lang.to_string(), table)
        })
        .collect()
}

fn translations() -> &'static HashMap<String, HashMap<String, String>> {
    TRANSLATIONS.get_or_init(build_translations)
}

fn lookup(lang: &str, key: &str) -> Option<&'static String> {
    translations().get(lang).and_then(|m| m.get(key))
}

/// Message for `key` in `lang`, falling back to Spanish and then to the key
/// itself. `{name}` placeholders are filled from `params`.
pub fn tr(lang: Option<&str>, key: &str, params: Option<&[(&str, &str)]>) -> String {
    let template = lang
        .and_then(|l| lookup(l, key))
        .or_else(|| lookup(DEFAULT_LANG, key))
        .map(String::as_str)
        .unwrap_or(key);

    params
        .unwrap_or_default()
        .iter()
        .fold(template.to_string(), |msg, (name, value)| {
            msg.replace(&format!("{{{}}}", name), value)
        })
}

pub fn t(key: &str) -> String {
    tr(None, key, None)
}

pub fn t_with(key: &str, params: &[(&str, &str)]) -> String {
    tr(None, key, Some(params))
}
