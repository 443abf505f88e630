use validator::ValidationError;

/// Indian mobile number: ten digits starting 6-9.
pub fn validate_indian_mobile(phone: &str) -> Result<(), ValidationError> {
    let ok = phone.len() == 10
        && phone.chars().all(|c| c.is_ascii_digit())
        && matches!(phone.as_bytes()[0], b'6'..=b'9');
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("indian_mobile"))
    }
}

/// Six-digit postal code that does not start with zero.
pub fn validate_pincode(pincode: &str) -> Result<(), ValidationError> {
    let ok = pincode.len() == 6
        && pincode.chars().all(|c| c.is_ascii_digit())
        && pincode.as_bytes()[0] != b'0';
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("pincode"))
    }
}

pub fn validate_aadhaar(number: &str) -> Result<(), ValidationError> {
    if number.len() == 12 && number.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("aadhaar"))
    }
}

/// 24-hour HH:MM shift boundary.
pub fn validate_shift_time(value: &str) -> Result<(), ValidationError> {
    match parse_shift_time(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("shift_time")),
    }
}

pub fn parse_shift_time(value: &str) -> Option<(u32, u32)> {
    let (h, m) = value.split_once(':')?;
    if m.len() != 2 || h.is_empty() || h.len() > 2 {
        return None;
    }
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    if hours < 24 && minutes < 60 {
        Some((hours, minutes))
    } else {
        None
    }
}

/// Whole hours between two same-day HH:MM boundaries, rounded up.
/// None when the end is not after the start.
pub fn shift_duration_hours(start: &str, end: &str) -> Option<i32> {
    let (sh, sm) = parse_shift_time(start)?;
    let (eh, em) = parse_shift_time(end)?;
    let start_min = (sh * 60 + sm) as i32;
    let end_min = (eh * 60 + em) as i32;
    if end_min <= start_min {
        return None;
    }
    Some((end_min - start_min + 59) / 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_numbers() {
        assert!(validate_indian_mobile("9876543210").is_ok());
        assert!(validate_indian_mobile("6000000000").is_ok());
        assert!(validate_indian_mobile("5876543210").is_err());
        assert!(validate_indian_mobile("98765").is_err());
        assert!(validate_indian_mobile("98765432x0").is_err());
    }

    #[test]
    fn pincodes() {
        assert!(validate_pincode("400001").is_ok());
        assert!(validate_pincode("040001").is_err());
        assert!(validate_pincode("4000011").is_err());
    }

    #[test]
    fn shift_times_and_duration() {
        assert!(validate_shift_time("08:30").is_ok());
        assert!(validate_shift_time("23:59").is_ok());
        assert!(validate_shift_time("24:00").is_err());
        assert!(validate_shift_time("8:5").is_err());

        assert_eq!(shift_duration_hours("09:00", "17:00"), Some(8));
        assert_eq!(shift_duration_hours("09:00", "17:30"), Some(9));
        assert_eq!(shift_duration_hours("17:00", "09:00"), None);
        assert_eq!(shift_duration_hours("09:00", "09:00"), None);
    }
}
