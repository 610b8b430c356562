//! GraphQL operation names and query text.
//!
//! The query strings are sent verbatim to the squid; they are the same
//! documents the network's block explorer issues, so the response shapes in
//! [`crate::wire`] track what the squid actually returns.

pub const OP_BLOCK_BY_ID: &str = "BlockById";
pub const OP_EXTRINSICS_BY_BLOCK_ID: &str = "ExtrinsicsByBlockId";
pub const OP_EVENTS_BY_BLOCK_ID: &str = "EventsByBlockId";
pub const OP_EVENT_BY_ID: &str = "EventById";
pub const OP_HOME_QUERY: &str = "HomeQuery";

pub const BLOCK_QUERY: &str = "query BlockById($blockId: BigInt!) {\n  blocks(limit: 10, where: {height_eq: $blockId}) {\n    id\n    height\n    hash\n    stateRoot\n    timestamp\n    extrinsicsRoot\n    specId\n    parentHash\n    extrinsicsCount\n    eventsCount\n    logs(limit: 10, orderBy: block_height_DESC) {\n      block {\n        height\n        timestamp\n        __typename\n      }\n      kind\n      id\n      __typename\n    }\n    author {\n      id\n      __typename\n    }\n    __typename\n  }\n}";

pub const EXTRINSIC_QUERY: &str = "query ExtrinsicsByBlockId($blockId: BigInt!, $first: Int!, $after: String) {\n  extrinsicsConnection(\n    orderBy: indexInBlock_ASC\n    first: $first\n    after: $after\n    where: {block: {height_eq: $blockId}}\n  ) {\n    edges {\n      node {\n        id\n        hash\n        name\n        success\n        block {\n          height\n          timestamp\n          __typename\n        }\n        indexInBlock\n        __typename\n      }\n      cursor\n      __typename\n    }\n    totalCount\n    pageInfo {\n      hasNextPage\n      endCursor\n      hasPreviousPage\n      startCursor\n      __typename\n    }\n    __typename\n  }\n}";

pub const EVENT_QUERY: &str = "query EventsByBlockId($blockId: BigInt!, $first: Int!, $after: String) {\n  eventsConnection(\n    orderBy: indexInBlock_ASC\n    first: $first\n    after: $after\n    where: {block: {height_eq: $blockId}}\n  ) {\n    edges {\n      node {\n        id\n        name\n        phase\n        indexInBlock\n        block {\n          height\n          id\n          __typename\n        }\n        extrinsic {\n          indexInBlock\n          block {\n            height\n            id\n            __typename\n          }\n          __typename\n        }\n        __typename\n      }\n      __typename\n    }\n    totalCount\n    pageInfo {\n      endCursor\n      hasNextPage\n      hasPreviousPage\n      startCursor\n      __typename\n    }\n    __typename\n  }\n}";

pub const EVENT_BY_ID_QUERY: &str = "query EventById($eventId: String!) {\n  eventById(id: $eventId) {\n    args\n    id\n    indexInBlock\n    name\n    phase\n    timestamp\n    call {\n      args\n      name\n      success\n      timestamp\n      id\n      __typename\n    }\n    extrinsic {\n      args\n      success\n      tip\n      fee\n      id\n      signer {\n        id\n        __typename\n      }\n      __typename\n    }\n    block {\n      height\n      id\n      timestamp\n      specId\n      hash\n      __typename\n    }\n    __typename\n  }\n}";

pub const HOME_QUERY: &str = "query HomeQuery($limit: Int!, $offset: Int!) {\n  blocks(limit: $limit, offset: $offset, orderBy: height_DESC) {\n    id\n    hash\n    height\n    timestamp\n    spacePledged\n    blockchainSize\n    extrinsicsCount\n    eventsCount\n    __typename\n  }\n}";
