use std::sync::Arc;
use std::thread;
use todolist_core::{Priority, ServiceError, TaskItem, TaskItemError, TaskListService};

fn names(service: &TaskListService) -> Vec<String> {
    service
        .list_tasks()
        .iter()
        .map(|task| task.name().to_string())
        .collect()
}

#[test]
fn add_task_orders_and_rejects_bad_input() {
    let service = TaskListService::new("Home");
    service.add_task("Later", "4/8/21", 3, "").unwrap();
    service.add_task(" Sooner ", "2/6/21", 1, "").unwrap();

    assert_eq!(names(&service), ["Sooner", "Later"]);
    assert_eq!(service.list_name(), "Home");
    assert_eq!(
        service.add_task("Later", "5/1/21", 1, ""),
        Err(ServiceError::DuplicateName("Later".to_string()))
    );
    assert_eq!(service.add_task("   ", "5/1/21", 1, ""), Err(ServiceError::InvalidName));
    assert_eq!(
        service.add_task("Bad", "5/1/21", 7, ""),
        Err(ServiceError::Item(TaskItemError::InvalidPriority(7)))
    );
    assert_eq!(
        service.add_task("Bad", "5-1-21", 1, ""),
        Err(ServiceError::Item(TaskItemError::InvalidDueDate("5-1-21".to_string())))
    );
    assert_eq!(service.len(), 2);
}

#[test]
fn complete_and_remove_report_missing_tasks() {
    let service = TaskListService::new("Home");
    service.add_task("Item", "2/6/21", 1, "").unwrap();

    service.complete_task("Item").unwrap();
    assert!(service.get_task("Item").unwrap().is_done());
    assert!(service.late_tasks().is_empty());

    assert_eq!(
        service.complete_task("Nope"),
        Err(ServiceError::TaskNotFound("Nope".to_string()))
    );
    let removed = service.remove_task("Item").unwrap();
    assert_eq!(removed.name(), "Item");
    assert_eq!(
        service.remove_task("Item").unwrap_err(),
        ServiceError::TaskNotFound("Item".to_string())
    );
    assert!(service.is_empty());
}

#[test]
fn reschedule_moves_task_and_validates_first() {
    let service = TaskListService::new("Work");
    service.add_task("A", "1/1/30", 1, "").unwrap();
    service.add_task("B", "1/2/30", 1, "").unwrap();
    service.add_task("C", "1/3/30", 1, "").unwrap();

    service.reschedule_task("A", "1/3/30", 1).unwrap();
    assert_eq!(names(&service), ["B", "C", "A"]);

    assert!(service.reschedule_task("B", "13", 1).is_err());
    assert_eq!(service.get_task("B").unwrap().due_date(), "1/2/30");
    assert_eq!(
        service.reschedule_task("Z", "1/3/30", 2),
        Err(ServiceError::TaskNotFound("Z".to_string()))
    );
}

#[test]
fn late_tasks_lists_open_overdue_items() {
    let service = TaskListService::new("Mixed");
    service.add_task("Old", "2/6/21", 2, "").unwrap();
    service.add_task("Future", "12/31/99", 2, "").unwrap();

    let late: Vec<String> = service
        .late_tasks()
        .iter()
        .map(|task| task.name().to_string())
        .collect();
    assert_eq!(late, ["Old"]);
}

#[test]
fn clear_and_render_listing() {
    let service = TaskListService::new("Home");
    service
        .insert(TaskItem::new_at("B", "2/8/21", Priority::Medium, "", None).unwrap())
        .unwrap();
    service
        .insert(TaskItem::new_at("A", "2/6/21", Priority::High, "", None).unwrap())
        .unwrap();
    assert_eq!(service.render_listing(), "To do 1. A\nTo do 2. B");

    service.clear();
    assert_eq!(service.render_listing(), "List is empty");
    assert_eq!(service.len(), 0);
}

#[test]
fn concurrent_inserts_are_serialized() {
    let service = Arc::new(TaskListService::new("Shared"));
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for step in 0..25 {
                    let name = format!("w{worker}-{step}");
                    let due = format!("{}/{}/30", step % 12 + 1, worker + 1);
                    service.add_task(&name, &due, 2, "").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(service.len(), 100);
    let service = Arc::try_unwrap(service).unwrap();
    let list = service.into_list();
    list.validate().unwrap();
}
