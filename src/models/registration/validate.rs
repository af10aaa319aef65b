use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::AppError;

use super::types::{AttendanceType, Member, NewRegistration, RegistrationRequest};

pub const MAX_ATTENDING: usize = 10;
pub const MAX_MIGHT: usize = 10;
pub const MAX_CANT: usize = 1;

pub const INVALID_EVENT_ID: &str = "Invalid event_id";
pub const INVALID_REGISTRATION_ID: &str = "Invalid registration id";
pub const MEMBER_LIMIT_EXCEEDED: &str = "Member count exceeds allowed limit";
pub const INVALID_MEMBER_FORMAT: &str = "Invalid name or phone format";

/// Latin and Arabic letters, whitespace, straight and curly apostrophes, hyphens.
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\x{0600}-\x{06FF}\s'’‘-]{2,120}$").unwrap());

/// Optional `+`, non-zero first digit, then digits, spaces, parentheses, hyphens.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9][0-9\s()-]{6,19}$").unwrap());

/// Error message for a bad member in the given list.
pub fn invalid_member_message(list: AttendanceType) -> &'static str {
    match list {
        AttendanceType::Attending => "Invalid attending member",
        AttendanceType::Might => "Invalid might-attend member",
        AttendanceType::Cant => "Invalid cant-attend member",
    }
}

/// Check name and phone of an already extracted member.
pub fn check_member(member: &Member) -> bool {
    let name = member.name.trim();
    let phone = member.phone.trim();

    let name_len = name.chars().count();
    let phone_len = phone.chars().count();
    if !(2..=120).contains(&name_len) || !(7..=20).contains(&phone_len) {
        return false;
    }
    NAME_RE.is_match(name) && PHONE_RE.is_match(phone)
}

/// Extract a trimmed `Member` from a raw JSON record, or `None` if the
/// record is not an object with valid `name` and `phone` strings.
pub fn parse_member(record: &Value) -> Option<Member> {
    let fields = record.as_object()?;
    let member = Member {
        name: fields.get("name")?.as_str()?.trim().to_string(),
        phone: fields.get("phone")?.as_str()?.trim().to_string(),
    };
    check_member(&member).then_some(member)
}

pub fn validate_member(record: &Value) -> bool {
    parse_member(record).is_some()
}

pub fn check_limits(attending: usize, might: usize, cant: usize) -> Result<(), AppError> {
    if attending > MAX_ATTENDING || might > MAX_MIGHT || cant > MAX_CANT {
        return Err(AppError::invalid(MEMBER_LIMIT_EXCEEDED));
    }
    Ok(())
}

/// Largest integer a JSON client can send without losing precision.
pub const MAX_SAFE_ID: i64 = 9_007_199_254_740_991;

fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_ID as f64)
        .then_some(value as i64)
}

fn in_id_range(id: &i64) -> bool {
    (1..=MAX_SAFE_ID).contains(id)
}

/// Parse a positive integer id from text such as a query parameter.
/// Accepts `"5"`, `" 5 "` and `"5.0"`.
pub fn parse_positive_id_str(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().and_then(integral))
        .filter(in_id_range)
}

/// Parse a positive integer id from a JSON number or numeric string.
pub fn parse_positive_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral))
            .filter(in_id_range),
        Value::String(s) => parse_positive_id_str(s),
        _ => None,
    }
}

fn parse_list(records: &[Value], list: AttendanceType) -> Result<Vec<Member>, AppError> {
    records
        .iter()
        .map(|record| {
            parse_member(record)
                .ok_or_else(|| AppError::invalid(invalid_member_message(list)))
        })
        .collect()
}

/// Turn a raw request into a `NewRegistration`. Checks run in order:
/// event id, each list's members, then list sizes.
pub fn validate_request(req: &RegistrationRequest) -> Result<NewRegistration, AppError> {
    let event_id =
        parse_positive_id(&req.event_id).ok_or_else(|| AppError::invalid(INVALID_EVENT_ID))?;

    let attending = parse_list(req.attending(), AttendanceType::Attending)?;
    let might = parse_list(req.might(), AttendanceType::Might)?;
    let cant = parse_list(req.cant(), AttendanceType::Cant)?;

    check_limits(attending.len(), might.len(), cant.len())?;

    Ok(NewRegistration { event_id, attending, might, cant })
}

/// Same checks as `validate_request`, for a `NewRegistration` built in code.
pub fn check_registration(new: &NewRegistration) -> Result<(), AppError> {
    if !in_id_range(&new.event_id) {
        return Err(AppError::invalid(INVALID_EVENT_ID));
    }
    for tagged in new.members() {
        if !check_member(tagged.member) {
            return Err(AppError::invalid(invalid_member_message(tagged.attendance_type)));
        }
    }
    check_limits(new.attending.len(), new.might.len(), new.cant.len())
}
