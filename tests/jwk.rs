//! JWK round-trip tests: JSON, PEM and materialization for every key type.

use assert_matches::assert_matches;

use jws_kit::{
    jwa::{EllipticCurve, KeyType},
    jwk::{GenerateOptions, JsonWebKey, JwkSet, KeyMaterial, KeyParams},
    KeyError,
};

fn generate(key_type: KeyType, curve: Option<EllipticCurve>) -> JsonWebKey {
    let options = GenerateOptions {
        curve,
        ..GenerateOptions::default()
    };
    JsonWebKey::generate(key_type, options).unwrap()
}

fn assert_json_round_trip(jwk: &JsonWebKey) {
    let json = serde_json::to_string(jwk).unwrap();
    let restored: JsonWebKey = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, *jwk);
}

#[test]
fn ec_p256_json_round_trip_is_byte_exact() {
    let jwk = generate(KeyType::Ec, Some(EllipticCurve::P256));
    let json = serde_json::to_string(&jwk).unwrap();
    let restored: JsonWebKey = serde_json::from_str(&json).unwrap();

    let (
        KeyParams::Ec { crv, x, y, d },
        KeyParams::Ec {
            crv: crv2,
            x: x2,
            y: y2,
            d: d2,
        },
    ) = (&jwk.params, &restored.params)
    else {
        panic!("unexpected params");
    };
    assert_eq!(crv, crv2);
    assert_eq!(x.as_ref(), x2.as_ref());
    assert_eq!(y.as_ref(), y2.as_ref());
    assert_eq!(
        d.as_ref().unwrap().as_ref(),
        d2.as_ref().unwrap().as_ref()
    );
}

#[test]
fn every_generated_key_type_round_trips_through_json() {
    let keys = [
        generate(KeyType::Rsa, None),
        generate(KeyType::Ec, Some(EllipticCurve::P256)),
        generate(KeyType::Ec, Some(EllipticCurve::P384)),
        generate(KeyType::Ec, Some(EllipticCurve::P521)),
        generate(KeyType::Okp, Some(EllipticCurve::Ed25519)),
        generate(KeyType::Okp, Some(EllipticCurve::X25519)),
        generate(KeyType::Oct, None),
    ];
    for jwk in &keys {
        assert_json_round_trip(jwk);
    }
}

#[test]
fn asymmetric_keys_round_trip_through_pem() {
    let keys = [
        generate(KeyType::Rsa, None),
        generate(KeyType::Ec, Some(EllipticCurve::P256)),
        generate(KeyType::Ec, Some(EllipticCurve::P384)),
        generate(KeyType::Ec, Some(EllipticCurve::P521)),
        generate(KeyType::Okp, Some(EllipticCurve::Ed25519)),
        generate(KeyType::Okp, Some(EllipticCurve::X25519)),
    ];
    for jwk in keys {
        let set = JwkSet {
            keys: vec![jwk.clone()],
        };
        let pem = set.to_pem().unwrap();
        let restored = JwkSet::parse_pem(pem.as_bytes()).unwrap();
        assert_eq!(restored.keys.len(), 1, "for {}", jwk.key_type());
        assert_eq!(restored.keys[0].params, jwk.params, "for {}", jwk.key_type());
    }
}

#[test]
fn public_halves_round_trip_through_pem() {
    let keys = [
        generate(KeyType::Rsa, None),
        generate(KeyType::Ec, Some(EllipticCurve::P384)),
        generate(KeyType::Okp, Some(EllipticCurve::Ed25519)),
        generate(KeyType::Okp, Some(EllipticCurve::X25519)),
    ];
    for jwk in keys {
        let public = jwk.to_public().unwrap();
        let set = JwkSet {
            keys: vec![public.clone()],
        };
        let pem = set.to_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----"));
        let restored = JwkSet::parse_pem(pem.as_bytes()).unwrap();
        assert_eq!(restored.keys[0].params, public.params);
    }
}

#[test]
fn symmetric_keys_refuse_pem() {
    let set = JwkSet {
        keys: vec![generate(KeyType::Oct, None)],
    };
    assert_matches!(set.to_pem(), Err(KeyError::IncompatibleKey(_)));
}

#[test]
fn rsa_materialization_accepts_missing_crt_members() {
    let jwk = generate(KeyType::Rsa, None);
    let KeyParams::Rsa {
        n, e, d, p, q, ..
    } = &jwk.params
    else {
        panic!("unexpected params");
    };
    // Strip the CRT members; they are optional on input.
    let stripped = JsonWebKey::new(KeyParams::Rsa {
        n: n.clone(),
        e: e.clone(),
        d: d.clone(),
        p: p.clone(),
        q: q.clone(),
        dp: None,
        dq: None,
        qi: None,
    });
    assert_matches!(
        stripped.materialize(),
        Ok(KeyMaterial::RsaPrivate(_))
    );
}

#[test]
fn rsa_private_key_without_primes_is_incomplete() {
    let jwk = generate(KeyType::Rsa, None);
    let KeyParams::Rsa { n, e, d, .. } = &jwk.params else {
        panic!("unexpected params");
    };
    let partial = JsonWebKey::new(KeyParams::Rsa {
        n: n.clone(),
        e: e.clone(),
        d: d.clone(),
        p: None,
        q: None,
        dp: None,
        dq: None,
        qi: None,
    });
    assert_matches!(partial.materialize(), Err(KeyError::IncompatibleKey(_)));
}

#[test]
fn public_rsa_jwk_materializes_as_public_key() {
    let jwk = generate(KeyType::Rsa, None).to_public().unwrap();
    assert!(!jwk.is_private());
    assert_matches!(jwk.materialize(), Ok(KeyMaterial::RsaPublic(_)));
}

#[test]
fn set_envelope_is_preserved_on_request() {
    let jwk = generate(KeyType::Okp, Some(EllipticCurve::Ed25519));
    let set = JwkSet { keys: vec![jwk] };

    let bare = set.to_json_value(false);
    assert!(bare.get("keys").is_none());
    let wrapped = set.to_json_value(true);
    assert_eq!(wrapped["keys"].as_array().unwrap().len(), 1);

    // Both emissions parse back to the same set.
    let from_bare = JwkSet::parse(bare.to_string().as_bytes()).unwrap();
    let from_wrapped = JwkSet::parse(wrapped.to_string().as_bytes()).unwrap();
    assert_eq!(from_bare, from_wrapped);
}

#[test]
fn generated_template_cannot_replace_key_material() {
    let template = serde_json::json!({ "d": "AAAA" });
    let serde_json::Value::Object(template) = template else {
        unreachable!();
    };
    let options = GenerateOptions {
        curve: Some(EllipticCurve::Ed25519),
        template: Some(template),
        ..GenerateOptions::default()
    };
    assert_matches!(
        JsonWebKey::generate(KeyType::Okp, options),
        Err(KeyError::ReservedField(field)) if field == "d"
    );
}

#[test]
fn shorter_wire_integers_are_accepted_on_input() {
    // A P-256 coordinate starting with a zero byte (1 in 256 keys) may
    // legitimately be sent 31 bytes long. Hunt for such a key and round-trip
    // it through a hand-shortened JSON document; materialization pads the
    // coordinate back to curve width.
    for _ in 0..1_024 {
        let jwk = generate(KeyType::Ec, Some(EllipticCurve::P256));
        let KeyParams::Ec { x, .. } = &jwk.params else {
            panic!("unexpected params");
        };
        if x.as_ref()[0] != 0 {
            continue;
        }

        let mut value = serde_json::to_value(&jwk).unwrap();
        let shortened = jws_kit::base64url_encode(&x.as_ref()[1..]);
        value["x"] = serde_json::Value::String(shortened);
        let jwk_short: JsonWebKey = serde_json::from_value(value).unwrap();
        assert_matches!(jwk_short.materialize(), Ok(KeyMaterial::EcPrivate(_)));
        return;
    }
    // (1 - 1/256)^1024 ≈ 1.8%: treat an unlucky run as a skip, not a
    // failure.
}

#[test]
fn key_ids_survive_set_round_trip() {
    let mut first = generate(KeyType::Okp, Some(EllipticCurve::Ed25519));
    first.set_key_id("first");
    let mut second = generate(KeyType::Oct, None);
    second.set_key_id("second");

    let set = JwkSet {
        keys: vec![first, second],
    };
    let json = set.to_json_value(false).to_string();
    let restored = JwkSet::parse(json.as_bytes()).unwrap();
    assert_eq!(restored.keys.len(), 2);
    assert_eq!(restored.keys[0].key_id.as_deref(), Some("first"));
    assert_eq!(restored.keys[1].key_id.as_deref(), Some("second"));
}
