use chrono::Weekday;

/// Группирует цифры по три с заданным разделителем
fn group_thousands(n: u64, separator: char) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(separator);
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Форматирует число с разделителями тысяч (точками), для размеров ответов
///
/// # Примеры
/// ```
/// use kivi_backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    group_thousands(n as u64, '.')
}

/// Сумма в рублях как в ru-RU: "27 000₽"
pub fn format_rub(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}₽", sign, group_thousands(amount.unsigned_abs(), ' '))
}

/// Название дня недели по-русски, строчными: "среда"
pub fn weekday_ru(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "понедельник",
        Weekday::Tue => "вторник",
        Weekday::Wed => "среда",
        Weekday::Thu => "четверг",
        Weekday::Fri => "пятница",
        Weekday::Sat => "суббота",
        Weekday::Sun => "воскресенье",
    }
}

/// English name as used by the distribution table: "Wednesday"
pub fn weekday_en(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Короткое название дня недели: "пн", "сб"
pub fn weekday_ru_short(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "пн",
        Weekday::Tue => "вт",
        Weekday::Wed => "ср",
        Weekday::Thu => "чт",
        Weekday::Fri => "пт",
        Weekday::Sat => "сб",
        Weekday::Sun => "вс",
    }
}

const MONTHS_RU: [&str; 12] = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август", "Сентябрь",
    "Октябрь", "Ноябрь", "Декабрь",
];

const MONTHS_RU_SHORT: [&str; 12] = [
    "Янв", "Фев", "Мар", "Апр", "Май", "Июн", "Июл", "Авг", "Сен", "Окт", "Ноя", "Дек",
];

/// Название месяца (1-12): "Октябрь"
pub fn month_ru(month: u32) -> &'static str {
    MONTHS_RU
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// Сокращение месяца (1-12): "Окт"
pub fn month_ru_short(month: u32) -> &'static str {
    MONTHS_RU_SHORT
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}
