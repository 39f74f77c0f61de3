use crate::core::components::design::Design;
use crate::core::errors::{SimError, StructuralError};
use crate::core::types::Endpoint;

#[test]
fn test_connect_unbound_ports_allocates_one_net() {
    let mut design = Design::new();
    let a = design.out_port(8).unwrap();
    let b = design.in_port(8).unwrap();
    design.connect(a, b).unwrap();

    assert_eq!(design.net_of(a), design.net_of(b));
    assert_eq!(design.net_count(), 1);

    design.write_raw(a.into(), 0x3c).unwrap();
    assert_eq!(design.read(b).unwrap(), 0x3c);
    design.write_raw(b.into(), 0x11).unwrap();
    assert_eq!(design.read(a).unwrap(), 0x11);
}

#[test]
fn test_bound_side_is_adopted() {
    let mut design = Design::new();
    let w = design.wire(4).unwrap();
    let p = design.in_port(4).unwrap();
    let before = design.net_count();
    design.connect(p, w).unwrap();

    assert_eq!(design.net_count(), before);
    assert_eq!(design.net_of(p), design.net_of(w));
}

#[test]
fn test_connection_order_does_not_matter() {
    let mut design = Design::new();
    let ports: Vec<_> = (0..4).map(|_| design.in_port(16).unwrap()).collect();
    design.connect(ports[0], ports[1]).unwrap();
    design.connect(ports[2], ports[3]).unwrap();
    assert_eq!(design.net_count(), 2);

    // joining the two groups leaves a single canonical net
    design.connect(ports[1], ports[2]).unwrap();
    assert_eq!(design.net_count(), 1);
    let net = design.net_of(ports[0]);
    assert!(ports.iter().all(|p| design.net_of(*p) == net));

    design.write_raw(ports[3].into(), 0xbeef).unwrap();
    assert!(ports.iter().all(|p| design.read(*p).unwrap() == 0xbeef));
}

#[test]
fn test_reconnecting_the_same_group_is_a_noop() {
    let mut design = Design::new();
    let a = design.wire(8).unwrap();
    let b = design.wire(8).unwrap();
    design.connect(a, b).unwrap();
    design.connect(b, a).unwrap();
    assert_eq!(design.net_of(a), design.net_of(b));
}

#[test]
fn test_constant_connection() {
    let mut design = Design::new();
    let p = design.in_port(4).unwrap();
    design.connect(p, 9u64).unwrap();
    assert_eq!(design.read(p).unwrap(), 9);

    let q = design.in_port(4).unwrap();
    assert_eq!(
        design.connect(q, 16u64),
        Err(SimError::Structural(StructuralError::ConstantOverflow {
            value: 16,
            width: 4
        }))
    );
}

#[test]
fn test_constant_merged_into_bound_net() {
    let mut design = Design::new();
    let w = design.wire(8).unwrap();
    design.connect(w, 0x42u64).unwrap();
    assert_eq!(design.read(w).unwrap(), 0x42);
}

#[test]
fn test_width_mismatch_rejected() {
    let mut design = Design::new();
    let a = design.out_port(8).unwrap();
    let b = design.in_port(4).unwrap();
    let err = design.connect(a, b).unwrap_err();
    assert!(matches!(
        err,
        SimError::Structural(StructuralError::WidthMismatch {
            left_width: 8,
            right_width: 4,
            ..
        })
    ));
}

#[test]
fn test_slice_connection_is_a_view() {
    let mut design = Design::new();
    let bus = design.in_port(8).unwrap();
    let flag = design.out_port(1).unwrap();
    design.connect(design.bit(bus, 3).unwrap(), flag).unwrap();

    design.write_raw(flag.into(), 1).unwrap();
    assert_eq!(design.read(bus).unwrap(), 0b1000);

    design.write_raw(bus.into(), 0xff).unwrap();
    design.write_raw(flag.into(), 0).unwrap();
    assert_eq!(design.read(bus).unwrap(), 0xf7);
    assert_eq!(design.read(flag).unwrap(), 0);
}

#[test]
fn test_slice_merges_with_existing_net() {
    let mut design = Design::new();
    let bus = design.in_port(8).unwrap();
    let nibble = design.wire(4).unwrap();
    design.write_raw(nibble.into(), 0x3).unwrap();
    design.connect(design.slice(bus, 4, 4).unwrap(), nibble).unwrap();

    // the wire's value survives the merge
    assert_eq!(design.read(bus).unwrap(), 0x30);
    design.write_raw(nibble.into(), 0xa).unwrap();
    assert_eq!(design.read(bus).unwrap(), 0xa0);
    assert_eq!(
        design.net_of(design.slice(bus, 4, 4).unwrap()),
        design.net_of(nibble)
    );
    assert_ne!(design.net_of(bus), design.net_of(nibble));
}

#[test]
fn test_narrow_group_nests_into_wide_group() {
    let mut design = Design::new();
    let wide = design.wire(16).unwrap();
    let narrow = design.wire(4).unwrap();
    let view = design.in_port(4).unwrap();
    design.connect(view, narrow).unwrap();
    design.connect(design.slice(wide, 8, 4).unwrap(), view).unwrap();

    design.write_raw(narrow.into(), 0x5).unwrap();
    assert_eq!(design.read(wide).unwrap(), 0x0500);
}

#[test]
fn test_port_on_both_halves_ties_them() {
    let mut design = Design::new();
    let bus = design.in_port(8).unwrap();
    let q = design.in_port(4).unwrap();
    design.connect(design.slice(bus, 0, 4).unwrap(), q).unwrap();
    design.connect(design.slice(bus, 4, 4).unwrap(), q).unwrap();

    design.write_raw(q.into(), 0x6).unwrap();
    assert_eq!(design.read(bus).unwrap(), 0x66);
    design.write_raw(design.slice(bus, 4, 4).unwrap().into(), 0x9).unwrap();
    assert_eq!(design.read(bus).unwrap(), 0x99);
    assert_eq!(design.read(q).unwrap(), 0x9);
}

#[test]
fn test_slice_to_slice_keeps_other_bits_apart() {
    let mut design = Design::new();
    let p = design.in_port(8).unwrap();
    let q = design.in_port(8).unwrap();
    design
        .connect(design.slice(p, 0, 4).unwrap(), design.slice(q, 0, 4).unwrap())
        .unwrap();

    design.write_raw(p.into(), 0xf0).unwrap();
    assert_eq!(design.read(q).unwrap(), 0x00);
    design.write_raw(p.into(), 0xa5).unwrap();
    assert_eq!(design.read(q).unwrap(), 0x05);
    design.write_raw(q.into(), 0x3c).unwrap();
    assert_eq!(design.read(p).unwrap(), 0xac);

    assert_ne!(design.net_of(p), design.net_of(q));
    assert_eq!(
        design.net_of(design.slice(p, 0, 4).unwrap()),
        design.net_of(design.slice(q, 0, 4).unwrap())
    );
    assert_ne!(
        design.net_of(design.slice(p, 4, 4).unwrap()),
        design.net_of(design.slice(q, 4, 4).unwrap())
    );
}

#[test]
fn test_port_fanned_out_to_two_slices() {
    let mut design = Design::new();
    let x = design.in_port(4).unwrap();
    let p = design.in_port(8).unwrap();
    let q = design.in_port(8).unwrap();
    design.connect(x, design.slice(p, 0, 4).unwrap()).unwrap();
    design.connect(x, design.slice(q, 0, 4).unwrap()).unwrap();

    design.write_raw(p.into(), 0xa0).unwrap();
    assert_eq!(design.read(q).unwrap(), 0x00);
    assert_eq!(design.read(x).unwrap(), 0x0);

    design.write_raw(x.into(), 0x7).unwrap();
    assert_eq!(design.read(p).unwrap(), 0xa7);
    assert_eq!(design.read(q).unwrap(), 0x07);
}

#[test]
fn test_unequal_slices_of_bound_buses() {
    let mut design = Design::new();
    let p = design.wire(8).unwrap();
    let q = design.wire(8).unwrap();
    design.write_raw(p.into(), 0x81).unwrap();
    design.write_raw(q.into(), 0x42).unwrap();
    // p[5:2] <-> q[7:4]
    design
        .connect(design.slice(p, 2, 4).unwrap(), design.slice(q, 4, 4).unwrap())
        .unwrap();

    // the zero field of p takes q's bits, everything else is untouched
    assert_eq!(design.read(p).unwrap(), 0x91);
    assert_eq!(design.read(q).unwrap(), 0x42);

    design.write_raw(p.into(), 0xff).unwrap();
    assert_eq!(design.read(q).unwrap(), 0xf2);
    design.write_raw(q.into(), 0x00).unwrap();
    assert_eq!(design.read(p).unwrap(), 0xc3);
}

#[test]
fn test_nets_of_lists_storage_of_a_partly_shared_port() {
    let mut design = Design::new();
    let p = design.in_port(8).unwrap();
    let q = design.in_port(8).unwrap();
    assert_eq!(design.nets_of(p), None);

    design
        .connect(design.slice(p, 4, 4).unwrap(), design.slice(q, 4, 4).unwrap())
        .unwrap();
    let p_nets = design.nets_of(p).unwrap();
    let q_nets = design.nets_of(q).unwrap();
    assert_eq!(p_nets.len(), 2);
    assert_eq!(p_nets[1], q_nets[1]);
    assert_ne!(p_nets[0], q_nets[0]);
    assert_eq!(design.net_count(), 3);
}

#[test]
fn test_peers_are_recorded_both_ways() {
    let mut design = Design::new();
    let a = design.out_port(2).unwrap();
    let b = design.in_port(2).unwrap();
    let c = design.in_port(2).unwrap();
    design.connect(a, b).unwrap();
    design.connect(a, c).unwrap();

    assert_eq!(
        design.connections_of(a).unwrap(),
        &[Endpoint::Signal(b), Endpoint::Signal(c)]
    );
    assert_eq!(design.connections_of(c).unwrap(), &[Endpoint::Signal(a)]);
}
