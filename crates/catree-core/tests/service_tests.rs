use catree_core::{
    CategoryAttrs, CategoryError, CategoryFilter, CategoryId, CategoryService, CategoryStatus,
    CategoryUpdate, MemoryStore, NewCategory,
};

fn create_test_service() -> CategoryService<MemoryStore> {
    CategoryService::new(MemoryStore::new())
}

#[test]
fn test_create_root_always_passes_parent_check() {
    let service = create_test_service();

    let id = service.create_category(NewCategory::root("Books")).unwrap();
    let category = service.get_category(id).unwrap().unwrap();

    assert_eq!(category.parent_id, CategoryId::NO_PARENT);
    assert_eq!(category.status, CategoryStatus::Enabled);
}

#[test]
fn test_create_under_missing_parent() {
    let service = create_test_service();

    let result = service.create_category(NewCategory::child_of(CategoryId(42), "Orphan"));
    assert!(matches!(result, Err(CategoryError::ParentNotFound(CategoryId(42)))));
    assert!(service.list_enabled().unwrap().is_empty());
}

#[test]
fn test_create_under_disabled_parent() {
    let service = create_test_service();
    let parent = service
        .create_category(NewCategory::root("Archive").with_status(CategoryStatus::Disabled))
        .unwrap();

    // Status does not matter for structure, only for usage
    assert!(service
        .create_category(NewCategory::child_of(parent, "Old"))
        .is_ok());
}

#[test]
fn test_delete_flow() {
    let service = create_test_service();
    let a = service.create_category(NewCategory::root("A")).unwrap();
    let b = service.create_category(NewCategory::child_of(a, "B")).unwrap();
    let c = service.create_category(NewCategory::child_of(b, "C")).unwrap();

    assert!(matches!(
        service.delete_category(b),
        Err(CategoryError::HasChildren { count: 1, .. })
    ));
    assert!(service.get_category(b).unwrap().is_some());

    service.delete_category(c).unwrap();
    assert!(service.get_category(c).unwrap().is_none());

    service.delete_category(b).unwrap();
    assert!(service.get_category(b).unwrap().is_none());
}

#[test]
fn test_update_to_missing_parent_leaves_category_unchanged() {
    let service = create_test_service();
    let a = service.create_category(NewCategory::root("A")).unwrap();
    let b = service.create_category(NewCategory::child_of(a, "B")).unwrap();
    let before = service.get_category(b).unwrap().unwrap();

    let update = CategoryUpdate {
        parent_id: CategoryId(999),
        status: CategoryStatus::Disabled,
        attrs: CategoryAttrs::named("Renamed"),
    };
    assert!(matches!(
        service.update_category(b, update),
        Err(CategoryError::ParentNotFound(CategoryId(999)))
    ));

    let after = service.get_category(b).unwrap().unwrap();
    assert_eq!(after, before);
}

#[test]
fn test_update_attributes() {
    let service = create_test_service();
    let a = service.create_category(NewCategory::root("A")).unwrap();

    let update = CategoryUpdate {
        parent_id: CategoryId::NO_PARENT,
        status: CategoryStatus::Enabled,
        attrs: CategoryAttrs {
            name: "Appliances".to_string(),
            sort: 4,
            description: Some("Home appliances".to_string()),
            ..Default::default()
        },
    };
    service.update_category(a, update).unwrap();

    let category = service.get_category(a).unwrap().unwrap();
    assert_eq!(category.attrs.name, "Appliances");
    assert_eq!(category.attrs.sort, 4);
    assert!(category.updated_at >= category.created_at);
}

#[test]
fn test_list_enabled_variants() {
    let service = create_test_service();
    let a = service.create_category(NewCategory::root("Phones")).unwrap();
    let b = service
        .create_category(
            NewCategory::child_of(a, "Feature phones").with_status(CategoryStatus::Disabled),
        )
        .unwrap();
    let c = service.create_category(NewCategory::child_of(a, "Smartphones")).unwrap();
    service.create_category(NewCategory::root("Laptops")).unwrap();

    let enabled = service.list_enabled().unwrap();
    assert_eq!(enabled.len(), 3);
    assert!(enabled.iter().all(|c| c.is_enabled()));

    let by_ids = service.list_enabled_by_ids(&[c, b, CategoryId(77)]).unwrap();
    let ids: Vec<CategoryId> = by_ids.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![b, c]);

    let filter = CategoryFilter {
        name: Some("PHONE".to_string()),
        parent_id: Some(a),
        ..Default::default()
    };
    let filtered = service.list_enabled_filtered(&filter).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, c);
}

#[test]
fn test_list_filtered_keeps_requested_status() {
    let service = create_test_service();
    let a = service.create_category(NewCategory::root("A")).unwrap();
    let d = service
        .create_category(NewCategory::child_of(a, "D").with_status(CategoryStatus::Disabled))
        .unwrap();

    let filter = CategoryFilter {
        status: Some(CategoryStatus::Disabled),
        ..Default::default()
    };
    let disabled = service.list_enabled_filtered(&filter).unwrap();
    let ids: Vec<CategoryId> = disabled.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![d]);

    let unfiltered = service
        .list_enabled_filtered(&CategoryFilter::default())
        .unwrap();
    let ids: Vec<CategoryId> = unfiltered.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![a]);

    let by_ids = service.list_enabled_by_ids(&[d]).unwrap();
    assert_eq!(by_ids.len(), 1);
    assert_eq!(by_ids[0].status, CategoryStatus::Disabled);
}
