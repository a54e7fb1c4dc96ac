// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Serde helpers encoding big integers as canonical big-endian byte strings.
//!
//! All persisted integers are non-negative; the sign is not encoded.

pub mod bigint_bytes {
    use num_bigint_dig::{BigInt, Sign};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        v.to_bytes_be().1.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Ok(BigInt::from_bytes_be(Sign::Plus, &bytes))
    }
}

pub mod opt_bigint_bytes {
    use num_bigint_dig::{BigInt, Sign};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        v: &Option<BigInt>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        v.as_ref().map(|n| n.to_bytes_be().1).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BigInt>, D::Error> {
        let bytes = Option::<Vec<u8>>::deserialize(deserializer)?;
        Ok(bytes.map(|b| BigInt::from_bytes_be(Sign::Plus, &b)))
    }
}

pub mod vec_bigint_bytes {
    use num_bigint_dig::{BigInt, Sign};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &[BigInt], serializer: S) -> Result<S::Ok, S::Error> {
        let bytes: Vec<Vec<u8>> = v.iter().map(|n| n.to_bytes_be().1).collect();
        bytes.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<BigInt>, D::Error> {
        let bytes = Vec::<Vec<u8>>::deserialize(deserializer)?;
        Ok(bytes
            .into_iter()
            .map(|b| BigInt::from_bytes_be(Sign::Plus, &b))
            .collect())
    }
}

pub mod vec_opt_bigint_bytes {
    use num_bigint_dig::{BigInt, Sign};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        v: &[Option<BigInt>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let bytes: Vec<Option<Vec<u8>>> = v
            .iter()
            .map(|n| n.as_ref().map(|n| n.to_bytes_be().1))
            .collect();
        bytes.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Option<BigInt>>, D::Error> {
        let bytes = Vec::<Option<Vec<u8>>>::deserialize(deserializer)?;
        Ok(bytes
            .into_iter()
            .map(|b| b.map(|b| BigInt::from_bytes_be(Sign::Plus, &b)))
            .collect())
    }
}
