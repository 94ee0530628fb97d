use harvest_osm::*;
use pretty_assertions::assert_eq;

fn area() -> AreaHandle {
    OverpassAreas::new()
        .from_bbox(Bbox::new(50.6, 7.1, 50.8, 7.3))
        .unwrap()
}

fn named(kind: ElementKind, tags: &str, name: &str, area: &AreaHandle) -> Statement {
    Statement::builder(kind)
        .tags(tags)
        .name(name)
        .area(area)
        .build()
        .unwrap()
}

fn op_of(st: &Statement) -> &harvest_osm::ast::OperationNode {
    st.environment().operation(st.root()).unwrap()
}

// ============================================================================
// Union
// ============================================================================

#[test]
fn test_union_appends_node() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    let st2 = named(ElementKind::Way, "railway", "st2", &a);
    let u = st1.union(&st2).unwrap();

    let node = op_of(&u);
    assert_eq!(node.op, OperatorKind::Union);
    assert_eq!(node.left.as_str(), "st1");
    assert_eq!(node.right.as_ref().unwrap().as_str(), "st2");
}

#[test]
fn test_union_merges_shared_area_once() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    let st2 = named(ElementKind::Way, "railway", "st2", &a);
    let u = (&st1 + &st2).unwrap();

    let env = u.environment();
    assert_eq!(env.named_areas().count(), 1);
    assert_eq!(env.statements().count(), 2);
    assert_eq!(env.operations().count(), 1);
}

#[test]
fn test_union_operators_agree() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    let st2 = named(ElementKind::Way, "railway", "st2", &a);
    let plus = (&st1 + &st2).unwrap();
    let pipe = (&st1 | &st2).unwrap();

    let plus_node = op_of(&plus);
    let pipe_node = op_of(&pipe);
    assert_eq!(plus_node.op, pipe_node.op);
    assert_eq!(plus_node.left, pipe_node.left);
    assert_eq!(plus_node.right, pipe_node.right);
}

#[test]
fn test_union_with_shared_operation_is_not_duplicated() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    let st2 = named(ElementKind::Way, "railway", "st2", &a);
    let st3 = named(ElementKind::Way, "waterway", "st3", &a);
    let shared = st1.union_as(&st2, "shared").unwrap();
    let left = shared.recurse_as(Direction::Down, "left").unwrap();
    let right = shared.union_as(&st3, "right").unwrap();

    let all = left.union_as(&right, "all").unwrap();
    let ops: Vec<_> = all
        .environment()
        .operations()
        .map(|(id, _)| id.as_str().to_string())
        .collect();
    assert_eq!(ops, vec!["shared", "left", "right", "all"]);
}

#[test]
fn test_union_conflicting_names() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "dup", &a);
    let st2 = named(ElementKind::Way, "railway", "dup", &a);
    let err = st1.union(&st2).unwrap_err();
    assert_eq!(err, QueryError::NameConflict(Identifier::parse("dup").unwrap()));
}

#[test]
fn test_union_all_folds_left() {
    let a = area();
    let st1 = named(ElementKind::Node, "amenity", "st1", &a);
    let st2 = named(ElementKind::Node, "shop", "st2", &a);
    let st3 = named(ElementKind::Node, "office", "st3", &a);
    let all = st1.union_all([&st2, &st3]).unwrap();

    let node = op_of(&all);
    assert_eq!(node.right.as_ref().unwrap().as_str(), "st3");
    let inner = all.environment().operation(&node.left).unwrap();
    assert_eq!(inner.left.as_str(), "st1");
    assert_eq!(inner.right.as_ref().unwrap().as_str(), "st2");
}

// ============================================================================
// Difference
// ============================================================================

#[test]
fn test_difference_is_not_commutative() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    let st2 = named(ElementKind::Way, "highway=path", "st2", &a);

    let ab = st1.difference_as(&st2, "diff").unwrap();
    let ba = st2.difference_as(&st1, "diff").unwrap();
    assert_ne!(ab, ba);
    assert_eq!(op_of(&ab).left.as_str(), "st1");
    assert_eq!(op_of(&ba).left.as_str(), "st2");
}

#[test]
fn test_difference_operator() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    let st2 = named(ElementKind::Way, "highway=path", "st2", &a);
    let d = (&st1 - &st2).unwrap();
    assert_eq!(op_of(&d).op, OperatorKind::Difference);
    assert_eq!(d.kind(), Some(ElementKind::Way));
}

#[test]
fn test_difference_all() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    let st2 = named(ElementKind::Way, "highway=path", "st2", &a);
    let st3 = named(ElementKind::Way, "highway=track", "st3", &a);
    let d = st1.difference_all(vec![&st2, &st3]).unwrap();
    assert_eq!(d.environment().operations().count(), 2);
}

#[test]
fn test_unary_negation_is_an_error() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    assert_eq!((-&st1).unwrap_err(), QueryError::UnaryNegationUnsupported);
    assert_eq!(st1.negate().unwrap_err(), QueryError::UnaryNegationUnsupported);
}

// ============================================================================
// Intersection
// ============================================================================

#[test]
fn test_intersect_same_kind() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    let st2 = named(ElementKind::Way, "bridge=yes", "st2", &a);
    let i = st1.intersect(&st2, ElementKind::Way).unwrap();
    assert_eq!(op_of(&i).op, OperatorKind::Intersect(ElementKind::Way));
    assert_eq!(i.kind(), Some(ElementKind::Way));
}

#[test]
fn test_intersect_kind_mismatch() {
    let a = area();
    let way = named(ElementKind::Way, "highway", "st1", &a);
    let node = named(ElementKind::Node, "highway=crossing", "st2", &a);
    let err = way.intersect(&node, ElementKind::Way).unwrap_err();
    assert!(matches!(
        err,
        QueryError::KindMismatch {
            expected: ElementKind::Way,
            ..
        }
    ));
}

#[test]
fn test_intersect_requires_requested_kind() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    let st2 = named(ElementKind::Way, "bridge=yes", "st2", &a);
    let err = st1.intersect(&st2, ElementKind::Node).unwrap_err();
    assert!(matches!(err, QueryError::KindMismatch { .. }));
}

#[test]
fn test_intersect_rejects_mixed_union() {
    let a = area();
    let way = named(ElementKind::Way, "highway", "st1", &a);
    let node = named(ElementKind::Node, "highway", "st2", &a);
    let mixed = way.union(&node).unwrap();
    assert_eq!(mixed.kind(), None);

    let other = named(ElementKind::Way, "bridge=yes", "st3", &a);
    let err = mixed.intersect(&other, ElementKind::Way).unwrap_err();
    assert_eq!(err.to_string(), "Kind mismatch: cannot intersect mixed with way as way");
}

// ============================================================================
// Recurse
// ============================================================================

#[test]
fn test_recurse_is_unary() {
    let a = area();
    let st1 = named(ElementKind::Relation, "type=route", "routes", &a);
    let down = st1.recurse(Direction::DownRecursive).unwrap();
    let node = op_of(&down);
    assert_eq!(node.op, OperatorKind::Recurse(Direction::DownRecursive));
    assert_eq!(node.left.as_str(), "routes");
    assert!(node.right.is_none());
    assert_eq!(down.kind(), None);
}

#[test]
fn test_recurse_markers() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    for (marker, direction) in [
        (">", Direction::Down),
        (">>", Direction::DownRecursive),
        ("<", Direction::Up),
        ("<<", Direction::UpRecursive),
    ] {
        let st = st1.recurse_marker(marker).unwrap();
        assert_eq!(op_of(&st).op, OperatorKind::Recurse(direction));
    }
}

#[test]
fn test_unknown_recurse_marker() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    let err = st1.recurse_marker("<>").unwrap_err();
    assert_eq!(err, QueryError::UnknownOperator("<>".into()));
}

// ============================================================================
// Purity and equality
// ============================================================================

#[test]
fn test_operands_are_untouched() {
    let a = area();
    let st1 = named(ElementKind::Way, "highway", "st1", &a);
    let st2 = named(ElementKind::Way, "railway", "st2", &a);
    let before1 = st1.clone();
    let before2 = st2.clone();

    let _ = st1.union(&st2).unwrap();
    let _ = st1.difference(&st2).unwrap();
    let _ = st1.recurse(Direction::Up).unwrap();

    assert_eq!(st1, before1);
    assert_eq!(st2, before2);
    assert_eq!(st1.environment().operations().count(), 0);
}

fn pipeline(area: &AreaHandle, second: &str, kind: ElementKind) -> Statement {
    let st1 = named(kind, "highway", "st1", area);
    let st2 = named(kind, second, "st2", area);
    st1.difference_as(&st2, "diff")
        .unwrap()
        .recurse_as(Direction::Down, "members")
        .unwrap()
}

#[test]
fn test_repeated_construction_is_equal() {
    let a = area();
    assert_eq!(
        pipeline(&a, "highway=path", ElementKind::Way),
        pipeline(&a, "highway=path", ElementKind::Way)
    );
}

#[test]
fn test_single_change_breaks_equality() {
    let a = area();
    let reference = pipeline(&a, "highway=path", ElementKind::Way);
    assert_ne!(reference, pipeline(&a, "highway=track", ElementKind::Way));
    assert_ne!(reference, pipeline(&a, "highway=path", ElementKind::Node));
    let elsewhere = OverpassAreas::new()
        .from_bbox(Bbox::new(50.6, 7.1, 50.9, 7.3))
        .unwrap();
    assert_ne!(reference, pipeline(&elsewhere, "highway=path", ElementKind::Way));
}

#[test]
fn test_repeated_construction_over_bbox_is_equal() {
    let hospitals = || {
        Statement::builder(ElementKind::Node)
            .tags("amenity=hospital")
            .name("h")
            .area(Bbox::new(50.6, 7.1, 50.8, 7.3))
            .build()
            .unwrap()
    };
    assert_eq!(hospitals(), hospitals());

    let first = hospitals().recurse_as(Direction::Up, "parents").unwrap();
    let second = hospitals().recurse_as(Direction::Up, "parents").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_scope_reads_from_a_statement() {
    let a = area();
    let routes = named(ElementKind::Relation, "type=route", "routes", &a);
    let ways = routes.scope(ElementKind::Way).tags("highway").build().unwrap();

    let leaf = ways.environment().statement(ways.root()).unwrap();
    assert_eq!(leaf.area, harvest_osm::ast::AreaRef::Named(routes.root().clone()));
    assert_eq!(ways.kind(), Some(ElementKind::Way));
}

#[test]
fn test_operator_arity() {
    assert!(OperatorKind::Union.is_binary());
    assert!(OperatorKind::Difference.is_binary());
    assert!(OperatorKind::Intersect(ElementKind::Way).is_binary());
    assert!(!OperatorKind::Recurse(Direction::Down).is_binary());

    let a = area();
    let down = named(ElementKind::Way, "highway", "st1", &a)
        .recurse(Direction::Down)
        .unwrap();
    assert!(!op_of(&down).op.is_binary());
    assert!(op_of(&down).right.is_none());
}
