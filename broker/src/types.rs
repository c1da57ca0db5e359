// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

pub type ClientId = String;
