//! Mock data the store starts with.

use sitecontrol_models::{
    DayDate, EntryStatus, JournalEntry, Project, ProjectStatus, WorkItem, WorkStatus,
};

use crate::store::SiteStore;

fn seed_date(literal: &str) -> DayDate {
    DayDate::parse(literal).expect("seed dates are valid dd.mm.yyyy literals")
}

impl SiteStore {
    /// Creates a store holding the fixed demo data set: two projects, four
    /// work items, two journal entries (one pending, one accepted), no
    /// inspections.
    pub fn seeded() -> Self {
        let mut store = SiteStore::new();

        store.add_project(
            Project::new(
                "p1",
                "Школа №12",
                "г. Сургут",
                seed_date("01.08.2024"),
                seed_date("15.11.2024"),
            )
            .with_progress(67)
            .with_status(ProjectStatus::Active),
        );
        store.add_project(
            Project::new(
                "p2",
                "ЖК Северный",
                "г. Тюмень",
                seed_date("15.05.2024"),
                seed_date("20.08.2024"),
            )
            .with_progress(100)
            .with_status(ProjectStatus::Completed),
        );

        store.add_work_item(
            WorkItem::builder("w1", "p1", "Монтаж вентиляции", seed_date("25.09.2024"))
                .status(WorkStatus::InProgress)
                .progress(60)
                .assignee("Иван Петров")
                .build(),
        );
        store.add_work_item(
            WorkItem::builder("w2", "p1", "Укладка фундамента", seed_date("30.08.2024"))
                .status(WorkStatus::Accepted)
                .progress(100)
                .build(),
        );
        store.add_work_item(
            WorkItem::builder("w3", "p1", "Монтаж окон", seed_date("15.10.2024"))
                .status(WorkStatus::Completed)
                .progress(100)
                .assignee("Андрей Смирнов")
                .build(),
        );
        store.add_work_item(
            WorkItem::builder("w4", "p2", "Кровельные работы", seed_date("10.08.2024"))
                .status(WorkStatus::Accepted)
                .progress(100)
                .build(),
        );

        store.add_journal_entry(
            JournalEntry::new(
                "p1",
                "w1",
                "Иван Петров",
                "Уложено 50 м кабеля в вентшахте. Выполнена прокладка по 2 и 3 этажам согласно проекту.",
                seed_date("15.08.2024"),
            )
            .with_id("e1"),
        );

        let mut accepted = JournalEntry::new(
            "p1",
            "w3",
            "Андрей Смирнов",
            "Смонтировано 3 окна в классных комнатах. Проверена герметичность установки.",
            seed_date("14.08.2024"),
        )
        .with_id("e2");
        accepted.status = EntryStatus::Accepted;
        accepted.comment = Some("Работа выполнена качественно".to_string());
        store.add_journal_entry(accepted);

        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_collections() {
        let store = SiteStore::seeded();

        assert_eq!(store.projects().len(), 2);
        assert_eq!(store.work_items().len(), 4);
        assert_eq!(store.journal().len(), 2);
        assert!(store.inspections().is_empty());
        assert!(store.active_inspection().is_none());
    }

    #[test]
    fn test_seeded_journal_newest_first() {
        let store = SiteStore::seeded();
        let journal = store.journal();

        assert_eq!(journal[0].id.as_str(), "e1");
        assert!(journal[0].submitted_on > journal[1].submitted_on);
        assert_eq!(journal[0].status, EntryStatus::Pending);
        assert_eq!(journal[1].status, EntryStatus::Accepted);
    }

    #[test]
    fn test_seeded_work_items_reference_existing_projects() {
        let store = SiteStore::seeded();
        for item in store.work_items() {
            assert!(store.project(&item.project_id).is_some(), "{}", item.id);
        }
    }

    #[test]
    fn test_seeding_is_deterministic() {
        assert_eq!(SiteStore::seeded(), SiteStore::seeded());
    }
}
