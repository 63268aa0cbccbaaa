//! Plain-text rendering of grids, events and holidays

use application::{CalendarGrid, CellCategory, GridCell, GridDay};
use domain::{Event, Holiday};

const LEGEND: &str = "* today  ^ holiday  + events";

fn marker(day: &GridDay) -> char {
    if day.is_today {
        '*'
    } else if day.category == CellCategory::Holiday {
        '^'
    } else if day.cell.has_events() {
        '+'
    } else {
        ' '
    }
}

fn render_cell(cell: &GridCell) -> String {
    match cell {
        GridCell::Blank => "    ".to_string(),
        GridCell::Day(day) => format!("{:>3}{}", day.cell.day_of_month, marker(day)),
    }
}

/// Seven-column table followed by notes for holidays and events
pub fn render_grid(grid: &CalendarGrid) -> String {
    let mut out = format!("{}\n", grid.title);

    for header in &grid.headers {
        out.push_str(&format!(" {} ", header.label));
    }
    out.push('\n');

    if grid.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    for week in grid.weeks() {
        let row: String = week.iter().map(render_cell).collect();
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out.push_str(LEGEND);
    out.push('\n');

    let notes: Vec<String> = grid.days().filter_map(day_note).collect();
    if !notes.is_empty() {
        out.push('\n');
        for note in notes {
            out.push_str(&note);
            out.push('\n');
        }
    }

    out
}

fn day_note(day: &GridDay) -> Option<String> {
    let cell = &day.cell;
    if cell.holiday_name.is_none() && !cell.has_events() {
        return None;
    }

    let mut note = format!("{:>2}日", cell.day_of_month);
    if let Some(rokuyo) = cell.rokuyo() {
        note.push_str(&format!(" [{rokuyo}]"));
    }
    if let Some(name) = &cell.holiday_name {
        note.push_str(&format!(" {name}"));
    }
    for event in &cell.events {
        note.push_str(&format!("\n    - {}", format_event(event)));
    }
    Some(note)
}

/// One line per event: id, title and time span
pub fn format_event(event: &Event) -> String {
    let span = if event.all_day {
        let (start, end) = (event.start_date.date_naive(), event.end_date.date_naive());
        if start == end {
            format!("{start} (all day)")
        } else {
            format!("{start} - {end} (all day)")
        }
    } else {
        format!(
            "{} - {}",
            event.start_date.format("%Y-%m-%d %H:%M"),
            event.end_date.format("%Y-%m-%d %H:%M")
        )
    };

    let mut line = format!("#{} {} ({span})", event.id, event.title);
    if !event.description.is_empty() {
        line.push_str(&format!(": {}", event.description));
    }
    line
}

pub fn format_holiday(holiday: &Holiday) -> String {
    format!("{} {}", holiday.date, holiday.name)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use application::GridBuilder;
    use chrono::{NaiveDate, TimeZone, Utc};
    use domain::{DateNavigator, DayCell, EventId, FixedClock, MonthData, MonthKey};

    use super::*;

    fn builder_on(y: i32, m: u32, d: u32) -> GridBuilder {
        let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(y, m, d).unwrap()));
        GridBuilder::new(DateNavigator::new(clock))
    }

    fn sample_event(all_day: bool) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 3, 20, 10, 0, 0).unwrap();
        Event {
            id: EventId::new(3),
            title: "Hanami".to_string(),
            description: String::new(),
            start_date: start,
            end_date: start + chrono::Duration::hours(2),
            all_day,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn march_layout() {
        let grid = builder_on(2024, 3, 15).build(&MonthData::blank(MonthKey::new(2024, 3).unwrap()));
        let text = render_grid(&grid);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "2024年 3月");
        assert_eq!(lines[1], " 日  月  火  水  木  金  土 ");
        // Five blanks, then Friday the 1st and Saturday the 2nd
        assert_eq!(lines[2], format!("{}  1   2", " ".repeat(20)));
        assert!(lines[4].contains(" 15*"));
        assert_eq!(lines[7], " 31");
        assert_eq!(lines[8], LEGEND);
    }

    #[test]
    fn notes_list_holidays_and_events() {
        let mut data = MonthData::blank(MonthKey::new(2024, 3).unwrap());
        data.days[19] = DayCell::new(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap())
            .with_holiday("春分の日")
            .with_day_type("大安")
            .with_events(vec![sample_event(false)]);

        let text = render_grid(&builder_on(2030, 1, 1).build(&data));

        assert!(text.contains(" 20^"));
        assert!(text.contains("20日 [大安] 春分の日"));
        assert!(text.contains("- #3 Hanami (2024-03-20 10:00 - 2024-03-20 12:00)"));
    }

    #[test]
    fn unknown_day_type_label_is_left_out() {
        let mut data = MonthData::blank(MonthKey::new(2024, 3).unwrap());
        data.days[19] = DayCell::new(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap())
            .with_holiday("春分の日")
            .with_day_type("晴れ");

        let text = render_grid(&builder_on(2030, 1, 1).build(&data));

        assert!(text.contains("20日 春分の日"));
        assert!(!text.contains("晴れ"));
    }

    #[test]
    fn empty_grid_shows_placeholder() {
        let grid = builder_on(2024, 3, 1).empty(MonthKey::new(2024, 3).unwrap());
        assert!(render_grid(&grid).ends_with("(no data)\n"));
    }

    #[test]
    fn all_day_event_shows_dates() {
        let event = sample_event(true);
        assert_eq!(format_event(&event), "#3 Hanami (2024-03-20 (all day))");
    }

    #[test]
    fn holiday_line() {
        let holiday = Holiday::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), "元日");
        assert_eq!(format_holiday(&holiday), "2024-01-01 元日");
    }
}
